//! Store del subflujo de asignación contra PostgreSQL
//!
//! Delega en los repositorios de órdenes y conductores; existe para que
//! el servicio de asignación dependa de un trait y no de las tablas.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AssignmentStatus, DriverStatus, Order};
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::order_repository::OrderRepository;
use crate::services::assignment_service::AssignmentStore;
use crate::utils::errors::AppResult;

pub struct PgAssignmentStore {
    orders: OrderRepository,
    drivers: DriverRepository,
}

impl PgAssignmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool.clone()),
            drivers: DriverRepository::new(pool),
        }
    }
}

#[async_trait]
impl AssignmentStore for PgAssignmentStore {
    async fn find_order(&self, order_id: Uuid) -> AppResult<Option<Order>> {
        self.orders.find_by_id(order_id).await
    }

    async fn driver_status(&self, driver_id: Uuid) -> AppResult<Option<DriverStatus>> {
        let driver = self.drivers.find_by_id(driver_id).await?;
        Ok(driver.map(|d| d.status))
    }

    async fn stage_assignment(&self, order_id: Uuid, driver_id: Uuid) -> AppResult<Order> {
        self.orders.stage_assignment(order_id, driver_id).await
    }

    async fn record_outcome(&self, order_id: Uuid, outcome: AssignmentStatus) -> AppResult<()> {
        self.orders.record_assignment_outcome(order_id, outcome).await
    }
}
