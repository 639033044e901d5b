//! Rutas del conductor para su asignación propuesta
//!
//! El rol de conductor se verifica en cada handler porque la identidad
//! del token (sub) es el driver_id que el servicio compara.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::assignment_controller::AssignmentController;
use crate::dto::order_dto::RespondAssignmentRequest;
use crate::middleware::auth::driver_claims;
use crate::services::assignment_service::AssignmentOutcome;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_assignment_router() -> Router<AppState> {
    Router::new()
        .route("/:order_id", get(current_assignment))
        .route("/:order_id/respond", post(respond_assignment))
}

async fn current_assignment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<Uuid>,
) -> Result<Json<AssignmentOutcome>, AppError> {
    let driver_id = driver_claims(&headers, &state.jwt)?;
    let controller = AssignmentController::new(state.pool.clone());
    let response = controller.current(order_id, driver_id).await?;
    Ok(Json(response))
}

async fn respond_assignment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<Uuid>,
    Json(request): Json<RespondAssignmentRequest>,
) -> Result<Json<AssignmentOutcome>, AppError> {
    let driver_id = driver_claims(&headers, &state.jwt)?;
    let controller = AssignmentController::new(state.pool.clone());
    let response = controller
        .respond(order_id, driver_id, request.decision)
        .await?;
    Ok(Json(response))
}
