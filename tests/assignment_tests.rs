//! Tests de integración del subflujo de aceptación de asignación
//!
//! Usa stores en memoria para verificar que el subflujo es de un solo
//! disparo: tras la primera decisión, responder de nuevo devuelve el
//! desenlace registrado sin reaplicar efectos.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use car_rental::models::{
    AssignmentStatus, DriverStatus, Order, OrderStatus, PaymentMethod, ServiceLevel, Transmission,
    VehicleStatus,
};
use car_rental::services::assignment_service::{
    AssignmentDecision, AssignmentService, AssignmentStore,
};
use car_rental::services::lifecycle_service::{
    LifecycleService, OrderSnapshot, TransitionEffects, TransitionStore,
};
use car_rental::utils::errors::{AppError, AppResult};

fn pending_order(service_level: ServiceLevel) -> Order {
    let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    Order {
        id: Uuid::new_v4(),
        order_code: "ORD-12345".to_string(),
        vehicle_id: Uuid::new_v4(),
        driver_id: None,
        proposed_driver_id: None,
        assignment_status: None,
        car_name: "Avanza".to_string(),
        car_type: "MPV".to_string(),
        car_fuel: "Gasolina".to_string(),
        car_transmission: Transmission::Manual,
        service_level,
        payment_method: PaymentMethod::BankTransfer,
        start_date: today,
        end_date: today + chrono::Duration::days(3),
        total_amount: Decimal::from(600_000),
        payment_proof_url: None,
        status: OrderStatus::Pending,
        created_at: Utc::now(),
        updated_at: None,
    }
}

#[derive(Debug, Clone)]
struct World {
    order: Order,
    drivers: HashMap<Uuid, DriverStatus>,
    vehicle_status: VehicleStatus,
    transitions_applied: usize,
    outcomes_recorded: usize,
}

struct InMemoryStores {
    world: Mutex<World>,
}

impl InMemoryStores {
    fn new(service_level: ServiceLevel) -> Self {
        Self {
            world: Mutex::new(World {
                order: pending_order(service_level),
                drivers: HashMap::new(),
                vehicle_status: VehicleStatus::Available,
                transitions_applied: 0,
                outcomes_recorded: 0,
            }),
        }
    }

    fn with_driver(self, driver_id: Uuid) -> Self {
        self.world
            .lock()
            .unwrap()
            .drivers
            .insert(driver_id, DriverStatus::Available);
        self
    }

    fn order_id(&self) -> Uuid {
        self.world.lock().unwrap().order.id
    }

    fn world(&self) -> World {
        self.world.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssignmentStore for &InMemoryStores {
    async fn find_order(&self, order_id: Uuid) -> AppResult<Option<Order>> {
        let world = self.world.lock().unwrap();
        Ok((world.order.id == order_id).then(|| world.order.clone()))
    }

    async fn driver_status(&self, driver_id: Uuid) -> AppResult<Option<DriverStatus>> {
        Ok(self.world.lock().unwrap().drivers.get(&driver_id).copied())
    }

    async fn stage_assignment(&self, order_id: Uuid, driver_id: Uuid) -> AppResult<Order> {
        let mut world = self.world.lock().unwrap();
        if world.order.id != order_id {
            return Err(AppError::NotFound("Orden no encontrada".to_string()));
        }
        world.order.proposed_driver_id = Some(driver_id);
        world.order.assignment_status = Some(AssignmentStatus::AwaitingResponse);
        Ok(world.order.clone())
    }

    async fn record_outcome(&self, order_id: Uuid, outcome: AssignmentStatus) -> AppResult<()> {
        let mut world = self.world.lock().unwrap();
        if world.order.id != order_id {
            return Err(AppError::NotFound("Orden no encontrada".to_string()));
        }
        world.order.assignment_status = Some(outcome);
        world.outcomes_recorded += 1;
        Ok(())
    }
}

#[async_trait]
impl TransitionStore for &InMemoryStores {
    async fn load(&self, order_id: Uuid) -> AppResult<OrderSnapshot> {
        let world = self.world.lock().unwrap();
        if world.order.id != order_id {
            return Err(AppError::NotFound("Orden no encontrada".to_string()));
        }
        Ok(OrderSnapshot {
            order_id: world.order.id,
            vehicle_id: world.order.vehicle_id,
            status: world.order.status,
            service_level: world.order.service_level,
            driver_id: world.order.driver_id,
            is_partner_unit: false,
        })
    }

    async fn apply(&self, _order_id: Uuid, effects: &TransitionEffects) -> AppResult<()> {
        let mut world = self.world.lock().unwrap();
        world.order.status = effects.order_status;
        if let Some(driver_id) = effects.set_order_driver {
            world.order.driver_id = Some(driver_id);
        }
        if let Some(status) = effects.vehicle_status {
            world.vehicle_status = status;
        }
        if let Some(previous) = effects.release_driver {
            world.drivers.insert(previous, DriverStatus::Available);
        }
        if let Some(driver_id) = effects.engage_driver {
            world.drivers.insert(driver_id, DriverStatus::OnDuty);
        }
        if let Some(outcome) = effects.assignment_status {
            world.order.assignment_status = Some(outcome);
        }
        world.transitions_applied += 1;
        Ok(())
    }
}

fn service(stores: &InMemoryStores) -> AssignmentService<&InMemoryStores, &InMemoryStores> {
    AssignmentService::new(stores, LifecycleService::new(stores))
}

#[tokio::test]
async fn test_aceptar_dos_veces_no_reaplica_efectos() {
    let driver = Uuid::new_v4();
    let stores = InMemoryStores::new(ServiceLevel::WithDriver).with_driver(driver);
    let svc = service(&stores);
    let order_id = stores.order_id();

    svc.propose(order_id, driver).await.unwrap();

    let first = svc
        .respond(order_id, driver, AssignmentDecision::Accept)
        .await
        .unwrap();
    assert_eq!(first.status, AssignmentStatus::Accepted);
    assert!(first.just_decided);
    assert_eq!(stores.world().transitions_applied, 1);

    // Segunda respuesta: devuelve lo registrado, sin nueva transición
    let second = svc
        .respond(order_id, driver, AssignmentDecision::Accept)
        .await
        .unwrap();
    assert_eq!(second.status, AssignmentStatus::Accepted);
    assert!(!second.just_decided);
    assert_eq!(second.driver_id, Some(driver));

    let world = stores.world();
    assert_eq!(world.transitions_applied, 1);
    assert_eq!(world.order.status, OrderStatus::Assigned);
    assert_eq!(world.drivers[&driver], DriverStatus::OnDuty);
}

#[tokio::test]
async fn test_decision_contraria_tras_decidir_devuelve_lo_registrado() {
    let driver = Uuid::new_v4();
    let stores = InMemoryStores::new(ServiceLevel::WithDriver).with_driver(driver);
    let svc = service(&stores);
    let order_id = stores.order_id();

    svc.propose(order_id, driver).await.unwrap();
    svc.respond(order_id, driver, AssignmentDecision::Reject)
        .await
        .unwrap();

    // Intentar aceptar después de rechazar: el desenlace ya está fijado
    let outcome = svc
        .respond(order_id, driver, AssignmentDecision::Accept)
        .await
        .unwrap();
    assert_eq!(outcome.status, AssignmentStatus::Rejected);
    assert!(!outcome.just_decided);

    let world = stores.world();
    assert_eq!(world.outcomes_recorded, 1);
    assert_eq!(world.transitions_applied, 0);
    assert_eq!(world.order.status, OrderStatus::Pending);
    assert_eq!(world.order.driver_id, None);
    assert_eq!(world.drivers[&driver], DriverStatus::Available);
}

#[tokio::test]
async fn test_lectura_antes_y_despues_de_decidir() {
    let driver = Uuid::new_v4();
    let stores = InMemoryStores::new(ServiceLevel::AllInclude).with_driver(driver);
    let svc = service(&stores);
    let order_id = stores.order_id();

    svc.propose(order_id, driver).await.unwrap();

    let before = svc.current(order_id, driver).await.unwrap();
    assert_eq!(before.status, AssignmentStatus::AwaitingResponse);
    assert!(!before.just_decided);

    svc.respond(order_id, driver, AssignmentDecision::Accept)
        .await
        .unwrap();

    let after = svc.current(order_id, driver).await.unwrap();
    assert_eq!(after.status, AssignmentStatus::Accepted);
    assert_eq!(after.driver_id, Some(driver));
}

#[tokio::test]
async fn test_solo_el_conductor_propuesto_puede_responder() {
    let driver = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let stores = InMemoryStores::new(ServiceLevel::WithDriver)
        .with_driver(driver)
        .with_driver(intruder);
    let svc = service(&stores);
    let order_id = stores.order_id();

    svc.propose(order_id, driver).await.unwrap();

    let err = svc
        .respond(order_id, intruder, AssignmentDecision::Accept)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(stores.world().transitions_applied, 0);
}

#[tokio::test]
async fn test_guardas_de_la_propuesta() {
    let driver = Uuid::new_v4();

    // Orden self-drive: no admite conductor
    let stores = InMemoryStores::new(ServiceLevel::SelfDrive).with_driver(driver);
    let svc = service(&stores);
    let err = svc.propose(stores.order_id(), driver).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Conductor ocupado
    let stores = InMemoryStores::new(ServiceLevel::WithDriver).with_driver(driver);
    stores
        .world
        .lock()
        .unwrap()
        .drivers
        .insert(driver, DriverStatus::OnDuty);
    let svc = service(&stores);
    let err = svc.propose(stores.order_id(), driver).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Orden que ya no está pendiente
    let stores = InMemoryStores::new(ServiceLevel::WithDriver).with_driver(driver);
    stores.world.lock().unwrap().order.status = OrderStatus::Approved;
    let svc = service(&stores);
    let err = svc.propose(stores.order_id(), driver).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
