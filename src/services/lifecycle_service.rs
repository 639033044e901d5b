//! Controlador de ciclo de vida de órdenes
//!
//! Única pieza del sistema autorizada a mutar el estado de
//! Order/Vehicle/Driver. La máquina de estados es:
//!
//! ```text
//! pending -> assigned -> approved -> completed
//!    \----------\
//!                -> rejected   (rama terminal desde pending/assigned)
//! ```
//!
//! `plan_transition` es puro: recibe un snapshot de la orden y un evento,
//! y devuelve o bien un no-op idempotente o los efectos a aplicar. Los
//! efectos se persisten en una sola operación atómica a través del trait
//! `TransitionStore`, de modo que nunca queda estado a medio aplicar.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{AssignmentStatus, OrderStatus, ServiceLevel, VehicleStatus};
use crate::utils::errors::{AppError, AppResult};

/// Snapshot mínimo de una orden para decidir una transición
#[derive(Debug, Clone, FromRow)]
pub struct OrderSnapshot {
    pub order_id: Uuid,
    pub vehicle_id: Uuid,
    pub status: OrderStatus,
    pub service_level: ServiceLevel,
    pub driver_id: Option<Uuid>,
    pub is_partner_unit: bool,
}

/// Eventos que puede recibir el controlador
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    /// Asignar (o reasignar) conductor. `confirmed_by_driver` indica que
    /// viene del subflujo de aceptación y debe registrar el desenlace.
    AssignDriver {
        driver_id: Uuid,
        confirmed_by_driver: bool,
    },
    Approve,
    Reject,
    Complete,
}

/// Efectos de una transición, aplicados como unidad atómica
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionEffects {
    pub order_status: OrderStatus,
    /// Conductor que queda registrado en la orden
    pub set_order_driver: Option<Uuid>,
    /// Nuevo estado del vehículo, si corresponde tocarlo
    pub vehicle_status: Option<VehicleStatus>,
    /// Conductor previo que vuelve a `available`
    pub release_driver: Option<Uuid>,
    /// Conductor que pasa a `on-duty`
    pub engage_driver: Option<Uuid>,
    /// Desenlace del subflujo de aceptación a registrar
    pub assignment_status: Option<AssignmentStatus>,
}

impl TransitionEffects {
    fn status_only(status: OrderStatus) -> Self {
        Self {
            order_status: status,
            set_order_driver: None,
            vehicle_status: None,
            release_driver: None,
            engage_driver: None,
            assignment_status: None,
        }
    }
}

/// Resultado de planear una transición
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionPlan {
    /// La orden ya está en el estado pedido; no hay efectos que aplicar
    NoOp(OrderStatus),
    Apply(TransitionEffects),
}

/// Decidir la transición para un evento dado el estado actual.
///
/// Función pura: no toca almacenamiento. Reglas clave:
/// - repetir una transición ya aplicada es un no-op, no un efecto duplicado;
/// - aprobar/completar una orden que requiere conductor sin conductor
///   asignado es un conflicto;
/// - reasignar conductor libera primero al anterior;
/// - asignar conductor solo tiene efectos del lado del conductor; el
///   vehículo pasa a `reserved` recién cuando el conductor acepta;
/// - las unidades de socio (`special`) no tocan el estado de flota
///   compartida en ningún caso de asignación.
pub fn plan_transition(order: &OrderSnapshot, event: &OrderEvent) -> AppResult<TransitionPlan> {
    match *event {
        OrderEvent::AssignDriver {
            driver_id,
            confirmed_by_driver,
        } => {
            if !order.service_level.requires_driver() {
                return Err(AppError::Validation(
                    "El nivel de servicio de la orden no incluye conductor".to_string(),
                ));
            }
            match order.status {
                OrderStatus::Pending | OrderStatus::Assigned => {
                    if order.status == OrderStatus::Assigned && order.driver_id == Some(driver_id) {
                        return Ok(TransitionPlan::NoOp(order.status));
                    }
                    Ok(TransitionPlan::Apply(TransitionEffects {
                        order_status: OrderStatus::Assigned,
                        set_order_driver: Some(driver_id),
                        // Solo la aceptación del conductor reserva el
                        // vehículo; la asignación directa del operador tiene
                        // efectos solo del lado del conductor. Unidades de
                        // socio: el stock contado reemplaza al campo de
                        // estado de flota compartida
                        vehicle_status: if confirmed_by_driver && !order.is_partner_unit {
                            Some(VehicleStatus::Reserved)
                        } else {
                            None
                        },
                        release_driver: order.driver_id.filter(|prev| *prev != driver_id),
                        engage_driver: Some(driver_id),
                        assignment_status: confirmed_by_driver.then_some(AssignmentStatus::Accepted),
                    }))
                }
                other => Err(AppError::Conflict(format!(
                    "No se puede asignar conductor a una orden en estado {:?}",
                    other
                ))),
            }
        }

        OrderEvent::Approve => match order.status {
            OrderStatus::Approved => Ok(TransitionPlan::NoOp(OrderStatus::Approved)),
            OrderStatus::Pending | OrderStatus::Assigned => {
                if order.service_level.requires_driver() && order.driver_id.is_none() {
                    return Err(AppError::Conflict(
                        "La orden requiere conductor asignado antes de aprobarse".to_string(),
                    ));
                }
                Ok(TransitionPlan::Apply(TransitionEffects {
                    vehicle_status: Some(VehicleStatus::Rented),
                    ..TransitionEffects::status_only(OrderStatus::Approved)
                }))
            }
            other => Err(AppError::Conflict(format!(
                "No se puede aprobar una orden en estado {:?}",
                other
            ))),
        },

        OrderEvent::Reject => match order.status {
            OrderStatus::Rejected => Ok(TransitionPlan::NoOp(OrderStatus::Rejected)),
            OrderStatus::Pending | OrderStatus::Assigned => {
                Ok(TransitionPlan::Apply(TransitionEffects {
                    vehicle_status: Some(VehicleStatus::Available),
                    release_driver: order.driver_id,
                    ..TransitionEffects::status_only(OrderStatus::Rejected)
                }))
            }
            other => Err(AppError::Conflict(format!(
                "No se puede rechazar una orden en estado {:?}",
                other
            ))),
        },

        OrderEvent::Complete => match order.status {
            OrderStatus::Completed => Ok(TransitionPlan::NoOp(OrderStatus::Completed)),
            OrderStatus::Approved => {
                if order.service_level.requires_driver() && order.driver_id.is_none() {
                    return Err(AppError::Conflict(
                        "La orden requiere conductor asignado antes de completarse".to_string(),
                    ));
                }
                Ok(TransitionPlan::Apply(TransitionEffects {
                    vehicle_status: Some(VehicleStatus::Available),
                    release_driver: order.driver_id,
                    ..TransitionEffects::status_only(OrderStatus::Completed)
                }))
            }
            other => Err(AppError::Conflict(format!(
                "No se puede completar una orden en estado {:?}",
                other
            ))),
        },
    }
}

/// Colaborador de persistencia de transiciones.
///
/// `apply` debe ser todo-o-nada: si alguna de las actualizaciones
/// (orden, vehículo, conductores) falla, ninguna queda persistida.
#[async_trait]
pub trait TransitionStore: Send + Sync {
    async fn load(&self, order_id: Uuid) -> AppResult<OrderSnapshot>;
    async fn apply(&self, order_id: Uuid, effects: &TransitionEffects) -> AppResult<()>;
}

/// Controlador: carga el snapshot, planea y aplica
pub struct LifecycleService<S: TransitionStore> {
    store: S,
}

impl<S: TransitionStore> LifecycleService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn transition(&self, order_id: Uuid, event: OrderEvent) -> AppResult<OrderStatus> {
        let snapshot = self.store.load(order_id).await?;

        match plan_transition(&snapshot, &event)? {
            TransitionPlan::NoOp(status) => {
                tracing::info!(
                    "Transición {:?} sobre orden {} ya aplicada (estado {:?}), no-op",
                    event,
                    order_id,
                    status
                );
                Ok(status)
            }
            TransitionPlan::Apply(effects) => {
                self.store.apply(order_id, &effects).await?;
                tracing::info!(
                    "Orden {} pasó a {:?} (vehículo: {:?}, libera conductor: {:?}, toma conductor: {:?})",
                    order_id,
                    effects.order_status,
                    effects.vehicle_status,
                    effects.release_driver,
                    effects.engage_driver
                );
                Ok(effects.order_status)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(status: OrderStatus, service_level: ServiceLevel, driver: Option<Uuid>) -> OrderSnapshot {
        OrderSnapshot {
            order_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            status,
            service_level,
            driver_id: driver,
            is_partner_unit: false,
        }
    }

    #[test]
    fn test_aprobar_self_drive_pendiente() {
        let order = snapshot(OrderStatus::Pending, ServiceLevel::SelfDrive, None);
        let plan = plan_transition(&order, &OrderEvent::Approve).unwrap();
        match plan {
            TransitionPlan::Apply(fx) => {
                assert_eq!(fx.order_status, OrderStatus::Approved);
                assert_eq!(fx.vehicle_status, Some(VehicleStatus::Rented));
                assert_eq!(fx.release_driver, None);
                assert_eq!(fx.engage_driver, None);
            }
            other => panic!("se esperaba Apply, fue {:?}", other),
        }
    }

    #[test]
    fn test_aprobar_dos_veces_es_noop() {
        let order = snapshot(OrderStatus::Approved, ServiceLevel::SelfDrive, None);
        let plan = plan_transition(&order, &OrderEvent::Approve).unwrap();
        assert_eq!(plan, TransitionPlan::NoOp(OrderStatus::Approved));
    }

    #[test]
    fn test_guard_aprobar_sin_conductor_requerido() {
        let order = snapshot(OrderStatus::Pending, ServiceLevel::WithDriver, None);
        let err = plan_transition(&order, &OrderEvent::Approve).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_asignar_conductor() {
        let order = snapshot(OrderStatus::Pending, ServiceLevel::WithDriver, None);
        let driver = Uuid::new_v4();
        let plan = plan_transition(
            &order,
            &OrderEvent::AssignDriver {
                driver_id: driver,
                confirmed_by_driver: false,
            },
        )
        .unwrap();
        match plan {
            TransitionPlan::Apply(fx) => {
                assert_eq!(fx.order_status, OrderStatus::Assigned);
                assert_eq!(fx.set_order_driver, Some(driver));
                assert_eq!(fx.engage_driver, Some(driver));
                assert_eq!(fx.release_driver, None);
                // La asignación directa del operador no reserva el vehículo
                assert_eq!(fx.vehicle_status, None);
            }
            other => panic!("se esperaba Apply, fue {:?}", other),
        }
    }

    #[test]
    fn test_solo_la_aceptacion_del_conductor_reserva_el_vehiculo() {
        let order = snapshot(OrderStatus::Pending, ServiceLevel::WithDriver, None);
        let plan = plan_transition(
            &order,
            &OrderEvent::AssignDriver {
                driver_id: Uuid::new_v4(),
                confirmed_by_driver: true,
            },
        )
        .unwrap();
        match plan {
            TransitionPlan::Apply(fx) => {
                assert_eq!(fx.vehicle_status, Some(VehicleStatus::Reserved));
                assert_eq!(fx.assignment_status, Some(AssignmentStatus::Accepted));
            }
            other => panic!("se esperaba Apply, fue {:?}", other),
        }
    }

    #[test]
    fn test_asignar_a_orden_self_drive_es_error() {
        let order = snapshot(OrderStatus::Pending, ServiceLevel::SelfDrive, None);
        let err = plan_transition(
            &order,
            &OrderEvent::AssignDriver {
                driver_id: Uuid::new_v4(),
                confirmed_by_driver: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_reasignar_libera_al_conductor_anterior() {
        let previous = Uuid::new_v4();
        let next = Uuid::new_v4();
        let order = snapshot(OrderStatus::Assigned, ServiceLevel::WithDriver, Some(previous));
        let plan = plan_transition(
            &order,
            &OrderEvent::AssignDriver {
                driver_id: next,
                confirmed_by_driver: false,
            },
        )
        .unwrap();
        match plan {
            TransitionPlan::Apply(fx) => {
                assert_eq!(fx.release_driver, Some(previous));
                assert_eq!(fx.engage_driver, Some(next));
                assert_eq!(fx.set_order_driver, Some(next));
            }
            other => panic!("se esperaba Apply, fue {:?}", other),
        }
    }

    #[test]
    fn test_reasignar_mismo_conductor_es_noop() {
        let driver = Uuid::new_v4();
        let order = snapshot(OrderStatus::Assigned, ServiceLevel::WithDriver, Some(driver));
        let plan = plan_transition(
            &order,
            &OrderEvent::AssignDriver {
                driver_id: driver,
                confirmed_by_driver: false,
            },
        )
        .unwrap();
        assert_eq!(plan, TransitionPlan::NoOp(OrderStatus::Assigned));
    }

    #[test]
    fn test_unidad_de_socio_no_toca_estado_del_vehiculo_al_asignar() {
        let mut order = snapshot(OrderStatus::Pending, ServiceLevel::WithDriver, None);
        order.is_partner_unit = true;
        let plan = plan_transition(
            &order,
            &OrderEvent::AssignDriver {
                driver_id: Uuid::new_v4(),
                confirmed_by_driver: true,
            },
        )
        .unwrap();
        match plan {
            TransitionPlan::Apply(fx) => {
                assert_eq!(fx.vehicle_status, None);
                assert_eq!(fx.assignment_status, Some(AssignmentStatus::Accepted));
            }
            other => panic!("se esperaba Apply, fue {:?}", other),
        }
    }

    #[test]
    fn test_rechazar_libera_vehiculo_y_conductor() {
        let driver = Uuid::new_v4();
        let order = snapshot(OrderStatus::Assigned, ServiceLevel::WithDriver, Some(driver));
        let plan = plan_transition(&order, &OrderEvent::Reject).unwrap();
        match plan {
            TransitionPlan::Apply(fx) => {
                assert_eq!(fx.order_status, OrderStatus::Rejected);
                assert_eq!(fx.vehicle_status, Some(VehicleStatus::Available));
                assert_eq!(fx.release_driver, Some(driver));
            }
            other => panic!("se esperaba Apply, fue {:?}", other),
        }
    }

    #[test]
    fn test_completar_solo_desde_aprobada() {
        let order = snapshot(OrderStatus::Pending, ServiceLevel::SelfDrive, None);
        let err = plan_transition(&order, &OrderEvent::Complete).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let order = snapshot(OrderStatus::Approved, ServiceLevel::SelfDrive, None);
        let plan = plan_transition(&order, &OrderEvent::Complete).unwrap();
        match plan {
            TransitionPlan::Apply(fx) => {
                assert_eq!(fx.order_status, OrderStatus::Completed);
                assert_eq!(fx.vehicle_status, Some(VehicleStatus::Available));
            }
            other => panic!("se esperaba Apply, fue {:?}", other),
        }
    }

    #[test]
    fn test_transiciones_desde_estados_terminales_son_conflicto() {
        for terminal in [OrderStatus::Rejected, OrderStatus::Completed] {
            let order = snapshot(terminal, ServiceLevel::SelfDrive, None);
            assert!(plan_transition(&order, &OrderEvent::Approve).is_err());
            assert!(plan_transition(
                &order,
                &OrderEvent::AssignDriver {
                    driver_id: Uuid::new_v4(),
                    confirmed_by_driver: false
                }
            )
            .is_err());
        }
    }
}
