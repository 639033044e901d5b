//! Subflujo de aceptación de asignación de conductor
//!
//! Capa opcional sobre el controlador de ciclo de vida: cuando una orden
//! requiere conductor, el conductor propuesto confirma o rechaza la
//! asignación. El subflujo es de un solo disparo: una vez decidido,
//! visitas repetidas devuelven el desenlace registrado en lugar de
//! volver a preguntar.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{AssignmentStatus, DriverStatus, Order, OrderStatus};
use crate::services::lifecycle_service::{LifecycleService, OrderEvent, TransitionStore};
use crate::utils::errors::{AppError, AppResult};

/// Decisión del conductor sobre la asignación propuesta
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentDecision {
    Accept,
    Reject,
}

/// Desenlace visible del subflujo
#[derive(Debug, Clone, serde::Serialize)]
pub struct AssignmentOutcome {
    pub order_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub status: AssignmentStatus,
    /// false cuando la decisión ya estaba registrada y solo se releyó
    pub just_decided: bool,
}

/// Colaborador de persistencia del subflujo
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn find_order(&self, order_id: Uuid) -> AppResult<Option<Order>>;
    async fn driver_status(&self, driver_id: Uuid) -> AppResult<Option<DriverStatus>>;
    /// Dejar el subflujo en `awaiting-response` con el conductor propuesto
    async fn stage_assignment(&self, order_id: Uuid, driver_id: Uuid) -> AppResult<Order>;
    /// Registrar el desenlace (usado para el rechazo; la aceptación se
    /// registra dentro de la transición atómica)
    async fn record_outcome(&self, order_id: Uuid, outcome: AssignmentStatus) -> AppResult<()>;
}

pub struct AssignmentService<A: AssignmentStore, S: TransitionStore> {
    store: A,
    lifecycle: LifecycleService<S>,
}

impl<A: AssignmentStore, S: TransitionStore> AssignmentService<A, S> {
    pub fn new(store: A, lifecycle: LifecycleService<S>) -> Self {
        Self { store, lifecycle }
    }

    /// Proponer un conductor para una orden pendiente que requiere conductor
    pub async fn propose(&self, order_id: Uuid, driver_id: Uuid) -> AppResult<Order> {
        let order = self
            .store
            .find_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Orden no encontrada".to_string()))?;

        if order.status != OrderStatus::Pending {
            return Err(AppError::Conflict(
                "Solo se puede proponer conductor sobre una orden pendiente".to_string(),
            ));
        }
        if !order.service_level.requires_driver() {
            return Err(AppError::Validation(
                "El nivel de servicio de la orden no incluye conductor".to_string(),
            ));
        }

        let status = self
            .store
            .driver_status(driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        if status != DriverStatus::Available {
            return Err(AppError::Conflict(
                "El conductor no está disponible".to_string(),
            ));
        }

        let order = self.store.stage_assignment(order_id, driver_id).await?;
        tracing::info!(
            "Asignación propuesta: orden {} -> conductor {}",
            order_id,
            driver_id
        );

        Ok(order)
    }

    /// Estado actual del subflujo para mostrarle al conductor
    pub async fn current(&self, order_id: Uuid, caller_driver: Uuid) -> AppResult<AssignmentOutcome> {
        let order = self
            .store
            .find_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Orden no encontrada".to_string()))?;

        let status = order.assignment_status.ok_or_else(|| {
            AppError::NotFound("La orden no tiene asignación propuesta".to_string())
        })?;

        self.check_caller(&order, caller_driver)?;

        Ok(AssignmentOutcome {
            order_id,
            driver_id: order.proposed_driver_id,
            status,
            just_decided: false,
        })
    }

    /// Responder la asignación. Idempotente tras decidir: si ya hay un
    /// desenlace registrado se devuelve ese, sin reaplicar efectos.
    pub async fn respond(
        &self,
        order_id: Uuid,
        caller_driver: Uuid,
        decision: AssignmentDecision,
    ) -> AppResult<AssignmentOutcome> {
        let order = self
            .store
            .find_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Orden no encontrada".to_string()))?;

        let status = order.assignment_status.ok_or_else(|| {
            AppError::Conflict("La orden no tiene asignación propuesta".to_string())
        })?;

        self.check_caller(&order, caller_driver)?;

        match status {
            // Lectura tras decidir: mostrar lo registrado
            AssignmentStatus::Accepted | AssignmentStatus::Rejected => Ok(AssignmentOutcome {
                order_id,
                driver_id: order.proposed_driver_id,
                status,
                just_decided: false,
            }),

            AssignmentStatus::AwaitingResponse => {
                let driver_id = order.proposed_driver_id.ok_or_else(|| {
                    AppError::Internal("Asignación en espera sin conductor propuesto".to_string())
                })?;

                match decision {
                    AssignmentDecision::Accept => {
                        // La transición registra el desenlace en la misma
                        // transacción que los efectos de asignación
                        self.lifecycle
                            .transition(
                                order_id,
                                OrderEvent::AssignDriver {
                                    driver_id,
                                    confirmed_by_driver: true,
                                },
                            )
                            .await?;

                        Ok(AssignmentOutcome {
                            order_id,
                            driver_id: Some(driver_id),
                            status: AssignmentStatus::Accepted,
                            just_decided: true,
                        })
                    }
                    AssignmentDecision::Reject => {
                        self.store
                            .record_outcome(order_id, AssignmentStatus::Rejected)
                            .await?;

                        // Señal fuera de banda hacia el operador
                        tracing::warn!(
                            "El conductor {} rechazó la asignación de la orden {}; la orden sigue pendiente",
                            driver_id,
                            order_id
                        );

                        Ok(AssignmentOutcome {
                            order_id,
                            driver_id: Some(driver_id),
                            status: AssignmentStatus::Rejected,
                            just_decided: true,
                        })
                    }
                }
            }
        }
    }

    fn check_caller(&self, order: &Order, caller_driver: Uuid) -> AppResult<()> {
        if order.proposed_driver_id != Some(caller_driver) {
            return Err(AppError::Forbidden(
                "La asignación no corresponde a este conductor".to_string(),
            ));
        }
        Ok(())
    }
}
