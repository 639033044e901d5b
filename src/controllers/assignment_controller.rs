//! Controlador del endpoint del conductor para responder asignaciones

use sqlx::PgPool;
use uuid::Uuid;

use crate::repositories::assignment_store::PgAssignmentStore;
use crate::repositories::transition_store::PgTransitionStore;
use crate::services::assignment_service::{AssignmentDecision, AssignmentOutcome, AssignmentService};
use crate::services::lifecycle_service::LifecycleService;
use crate::utils::errors::AppResult;

pub struct AssignmentController {
    assignment: AssignmentService<PgAssignmentStore, PgTransitionStore>,
}

impl AssignmentController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            assignment: AssignmentService::new(
                PgAssignmentStore::new(pool.clone()),
                LifecycleService::new(PgTransitionStore::new(pool)),
            ),
        }
    }

    pub async fn current(&self, order_id: Uuid, driver_id: Uuid) -> AppResult<AssignmentOutcome> {
        self.assignment.current(order_id, driver_id).await
    }

    pub async fn respond(
        &self,
        order_id: Uuid,
        driver_id: Uuid,
        decision: AssignmentDecision,
    ) -> AppResult<AssignmentOutcome> {
        self.assignment.respond(order_id, driver_id, decision).await
    }
}
