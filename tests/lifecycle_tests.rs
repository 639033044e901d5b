//! Tests de integración del ciclo de vida de órdenes
//!
//! Usa un `TransitionStore` en memoria con inyección de fallas para
//! verificar la atomicidad todo-o-nada sin base de datos.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use car_rental::models::{
    AssignmentStatus, DriverStatus, OrderStatus, ServiceLevel, Transmission, VehicleStatus,
};
use car_rental::services::lifecycle_service::{
    LifecycleService, OrderEvent, OrderSnapshot, TransitionEffects, TransitionStore,
};
use car_rental::services::pricing_service::{compute_price, ServiceCosts};
use car_rental::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone)]
struct World {
    order_status: OrderStatus,
    order_driver: Option<Uuid>,
    assignment_status: Option<AssignmentStatus>,
    vehicle_status: VehicleStatus,
    drivers: HashMap<Uuid, DriverStatus>,
}

struct InMemoryStore {
    order_id: Uuid,
    vehicle_id: Uuid,
    service_level: ServiceLevel,
    is_partner_unit: bool,
    world: Mutex<World>,
    /// Cuando está activo, `apply` falla sin persistir nada
    fail_apply: Mutex<bool>,
}

impl InMemoryStore {
    fn new(service_level: ServiceLevel, vehicle_status: VehicleStatus) -> Self {
        Self {
            order_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            service_level,
            is_partner_unit: false,
            world: Mutex::new(World {
                order_status: OrderStatus::Pending,
                order_driver: None,
                assignment_status: None,
                vehicle_status,
                drivers: HashMap::new(),
            }),
            fail_apply: Mutex::new(false),
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

    fn set_fail(&self, fail: bool) {
        *self.fail_apply.lock().unwrap() = fail;
    }

    fn world(&self) -> World {
        self.world.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransitionStore for &InMemoryStore {
    async fn load(&self, order_id: Uuid) -> AppResult<OrderSnapshot> {
        if order_id != self.order_id {
            return Err(AppError::NotFound("Orden no encontrada".to_string()));
        }
        let world = self.world.lock().unwrap();
        Ok(OrderSnapshot {
            order_id: self.order_id,
            vehicle_id: self.vehicle_id,
            status: world.order_status,
            service_level: self.service_level,
            driver_id: world.order_driver,
            is_partner_unit: self.is_partner_unit,
        })
    }

    async fn apply(&self, _order_id: Uuid, effects: &TransitionEffects) -> AppResult<()> {
        if *self.fail_apply.lock().unwrap() {
            return Err(AppError::Internal("falla simulada".to_string()));
        }

        let mut world = self.world.lock().unwrap();

        // Misma regla que el store real: tomar un conductor que no está
        // disponible aborta sin dejar efectos parciales
        if let Some(driver_id) = effects.engage_driver {
            match world.drivers.get(&driver_id) {
                Some(DriverStatus::Available) => {}
                _ => {
                    return Err(AppError::Conflict(
                        "El conductor no está disponible".to_string(),
                    ))
                }
            }
        }

        world.order_status = effects.order_status;
        if let Some(driver_id) = effects.set_order_driver {
            world.order_driver = Some(driver_id);
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
            world.assignment_status = Some(outcome);
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_flujo_completo_self_drive() {
    let store = InMemoryStore::new(ServiceLevel::SelfDrive, VehicleStatus::Available);
    let service = LifecycleService::new(&store);

    // Cotización del escenario: 200000 por día, 2 días, self-drive
    let breakdown = compute_price(
        Some(Decimal::from(200_000)),
        None,
        Transmission::Manual,
        ServiceLevel::SelfDrive,
        2,
        &ServiceCosts::zero(),
    );
    assert_eq!(breakdown.total, Decimal::from(400_000));

    let status = service
        .transition(store.order_id, OrderEvent::Approve)
        .await
        .unwrap();
    assert_eq!(status, OrderStatus::Approved);
    assert_eq!(store.world().vehicle_status, VehicleStatus::Rented);

    let status = service
        .transition(store.order_id, OrderEvent::Complete)
        .await
        .unwrap();
    assert_eq!(status, OrderStatus::Completed);
    assert_eq!(store.world().vehicle_status, VehicleStatus::Available);
}

#[tokio::test]
async fn test_flujo_con_conductor() {
    let driver = Uuid::new_v4();
    let store =
        InMemoryStore::new(ServiceLevel::WithDriver, VehicleStatus::Available).with_driver(driver);
    let service = LifecycleService::new(&store);

    let status = service
        .transition(
            store.order_id,
            OrderEvent::AssignDriver {
                driver_id: driver,
                confirmed_by_driver: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(status, OrderStatus::Assigned);

    let world = store.world();
    assert_eq!(world.order_driver, Some(driver));
    // La asignación directa deja el vehículo como estaba
    assert_eq!(world.vehicle_status, VehicleStatus::Available);
    assert_eq!(world.drivers[&driver], DriverStatus::OnDuty);

    service
        .transition(store.order_id, OrderEvent::Approve)
        .await
        .unwrap();
    assert_eq!(store.world().vehicle_status, VehicleStatus::Rented);

    service
        .transition(store.order_id, OrderEvent::Complete)
        .await
        .unwrap();

    let world = store.world();
    assert_eq!(world.order_status, OrderStatus::Completed);
    assert_eq!(world.vehicle_status, VehicleStatus::Available);
    assert_eq!(world.drivers[&driver], DriverStatus::Available);
}

#[tokio::test]
async fn test_aprobar_sin_conductor_no_cambia_nada() {
    let store = InMemoryStore::new(ServiceLevel::WithDriver, VehicleStatus::Available);
    let service = LifecycleService::new(&store);

    let err = service
        .transition(store.order_id, OrderEvent::Approve)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let world = store.world();
    assert_eq!(world.order_status, OrderStatus::Pending);
    assert_eq!(world.vehicle_status, VehicleStatus::Available);
}

#[tokio::test]
async fn test_transicion_repetida_es_noop() {
    let store = InMemoryStore::new(ServiceLevel::SelfDrive, VehicleStatus::Available);
    let service = LifecycleService::new(&store);

    service
        .transition(store.order_id, OrderEvent::Approve)
        .await
        .unwrap();

    // Segunda aprobación: mismo resultado, ningún efecto nuevo aunque el
    // store esté configurado para fallar
    store.set_fail(true);
    let status = service
        .transition(store.order_id, OrderEvent::Approve)
        .await
        .unwrap();
    assert_eq!(status, OrderStatus::Approved);
    assert_eq!(store.world().vehicle_status, VehicleStatus::Rented);
}

#[tokio::test]
async fn test_falla_de_persistencia_no_deja_estado_parcial() {
    let driver = Uuid::new_v4();
    let store =
        InMemoryStore::new(ServiceLevel::WithDriver, VehicleStatus::Available).with_driver(driver);
    let service = LifecycleService::new(&store);

    store.set_fail(true);
    let err = service
        .transition(
            store.order_id,
            OrderEvent::AssignDriver {
                driver_id: driver,
                confirmed_by_driver: false,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));

    let world = store.world();
    assert_eq!(world.order_status, OrderStatus::Pending);
    assert_eq!(world.order_driver, None);
    assert_eq!(world.vehicle_status, VehicleStatus::Available);
    assert_eq!(world.drivers[&driver], DriverStatus::Available);

    // Al reintentar sin falla la transición se aplica normalmente
    store.set_fail(false);
    service
        .transition(
            store.order_id,
            OrderEvent::AssignDriver {
                driver_id: driver,
                confirmed_by_driver: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(store.world().order_status, OrderStatus::Assigned);
}

#[tokio::test]
async fn test_conductor_ocupado_aborta_la_asignacion() {
    let driver = Uuid::new_v4();
    let store =
        InMemoryStore::new(ServiceLevel::WithDriver, VehicleStatus::Available).with_driver(driver);
    store
        .world
        .lock()
        .unwrap()
        .drivers
        .insert(driver, DriverStatus::OnDuty);
    let service = LifecycleService::new(&store);

    let err = service
        .transition(
            store.order_id,
            OrderEvent::AssignDriver {
                driver_id: driver,
                confirmed_by_driver: false,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let world = store.world();
    assert_eq!(world.order_status, OrderStatus::Pending);
    assert_eq!(world.vehicle_status, VehicleStatus::Available);
}

#[tokio::test]
async fn test_reasignacion_libera_al_anterior() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let store = InMemoryStore::new(ServiceLevel::AllInclude, VehicleStatus::Available)
        .with_driver(first)
        .with_driver(second);
    let service = LifecycleService::new(&store);

    service
        .transition(
            store.order_id,
            OrderEvent::AssignDriver {
                driver_id: first,
                confirmed_by_driver: false,
            },
        )
        .await
        .unwrap();

    service
        .transition(
            store.order_id,
            OrderEvent::AssignDriver {
                driver_id: second,
                confirmed_by_driver: false,
            },
        )
        .await
        .unwrap();

    let world = store.world();
    assert_eq!(world.order_driver, Some(second));
    assert_eq!(world.drivers[&first], DriverStatus::Available);
    assert_eq!(world.drivers[&second], DriverStatus::OnDuty);
}

#[tokio::test]
async fn test_rechazo_libera_vehiculo_y_conductor() {
    let driver = Uuid::new_v4();
    let store =
        InMemoryStore::new(ServiceLevel::WithDriver, VehicleStatus::Available).with_driver(driver);
    let service = LifecycleService::new(&store);

    service
        .transition(
            store.order_id,
            OrderEvent::AssignDriver {
                driver_id: driver,
                confirmed_by_driver: false,
            },
        )
        .await
        .unwrap();

    let status = service
        .transition(store.order_id, OrderEvent::Reject)
        .await
        .unwrap();
    assert_eq!(status, OrderStatus::Rejected);

    let world = store.world();
    assert_eq!(world.vehicle_status, VehicleStatus::Available);
    assert_eq!(world.drivers[&driver], DriverStatus::Available);
}

#[tokio::test]
async fn test_aceptacion_del_conductor_registra_desenlace() {
    let driver = Uuid::new_v4();
    let store =
        InMemoryStore::new(ServiceLevel::WithDriver, VehicleStatus::Available).with_driver(driver);
    let service = LifecycleService::new(&store);

    service
        .transition(
            store.order_id,
            OrderEvent::AssignDriver {
                driver_id: driver,
                confirmed_by_driver: true,
            },
        )
        .await
        .unwrap();

    let world = store.world();
    assert_eq!(world.order_status, OrderStatus::Assigned);
    assert_eq!(world.assignment_status, Some(AssignmentStatus::Accepted));
    // La aceptación sí reserva el vehículo
    assert_eq!(world.vehicle_status, VehicleStatus::Reserved);
}
