//! Controlador de órdenes del dashboard
//!
//! Todas las mutaciones de estado pasan por el controlador de ciclo de
//! vida; ninguna ruta toca los campos de estado directamente.

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::order_dto::{OrderResponse, TransitionResponse};
use crate::models::Order;
use crate::repositories::assignment_store::PgAssignmentStore;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::order_repository::OrderRepository;
use crate::repositories::transition_store::PgTransitionStore;
use crate::services::assignment_service::AssignmentService;
use crate::services::lifecycle_service::{LifecycleService, OrderEvent};
use crate::utils::errors::{AppError, AppResult};

pub struct OrderController {
    orders: OrderRepository,
    drivers: DriverRepository,
    lifecycle: LifecycleService<PgTransitionStore>,
    assignment: AssignmentService<PgAssignmentStore, PgTransitionStore>,
}

impl OrderController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool.clone()),
            lifecycle: LifecycleService::new(PgTransitionStore::new(pool.clone())),
            assignment: AssignmentService::new(
                PgAssignmentStore::new(pool.clone()),
                LifecycleService::new(PgTransitionStore::new(pool)),
            ),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<OrderResponse>> {
        let orders = self.orders.list().await?;
        Ok(orders.into_iter().map(OrderResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<OrderResponse> {
        let order = self.find(id).await?;
        Ok(order.into())
    }

    /// Asignación directa por el operador (sin subflujo de aceptación)
    pub async fn assign_driver(&self, order_id: Uuid, driver_id: Uuid) -> AppResult<TransitionResponse> {
        // El conductor debe existir; su disponibilidad se hace cumplir
        // dentro de la transacción de la transición
        self.drivers
            .find_by_id(driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        let status = self
            .lifecycle
            .transition(
                order_id,
                OrderEvent::AssignDriver {
                    driver_id,
                    confirmed_by_driver: false,
                },
            )
            .await?;

        Ok(TransitionResponse { order_id, status })
    }

    /// Proponer conductor vía subflujo de aceptación
    pub async fn propose_driver(&self, order_id: Uuid, driver_id: Uuid) -> AppResult<OrderResponse> {
        let order = self.assignment.propose(order_id, driver_id).await?;
        Ok(order.into())
    }

    pub async fn approve(&self, order_id: Uuid) -> AppResult<TransitionResponse> {
        let status = self.lifecycle.transition(order_id, OrderEvent::Approve).await?;
        Ok(TransitionResponse { order_id, status })
    }

    pub async fn reject(&self, order_id: Uuid) -> AppResult<TransitionResponse> {
        let status = self.lifecycle.transition(order_id, OrderEvent::Reject).await?;
        Ok(TransitionResponse { order_id, status })
    }

    pub async fn complete(&self, order_id: Uuid) -> AppResult<TransitionResponse> {
        let status = self.lifecycle.transition(order_id, OrderEvent::Complete).await?;
        Ok(TransitionResponse { order_id, status })
    }

    async fn find(&self, id: Uuid) -> AppResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Orden no encontrada".to_string()))
    }
}
