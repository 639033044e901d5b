//! Rutas de órdenes del dashboard (requieren operador)
//!
//! Las transiciones de estado son endpoints explícitos; no existe un
//! PUT genérico que permita escribir `status` a mano.

use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::order_controller::OrderController;
use crate::dto::order_dto::{AssignDriverRequest, OrderResponse, TransitionResponse};
use crate::middleware::auth::require_operator;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_order_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/assign-driver", post(assign_driver))
        .route("/:id/propose-driver", post(propose_driver))
        .route("/:id/approve", post(approve_order))
        .route("/:id/reject", post(reject_order))
        .route("/:id/complete", post(complete_order))
        .route_layer(middleware::from_fn_with_state(state, require_operator))
}

async fn list_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn assign_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignDriverRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.assign_driver(id, request.driver_id).await?;
    Ok(Json(response))
}

async fn propose_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignDriverRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.propose_driver(id, request.driver_id).await?;
    Ok(Json(response))
}

async fn approve_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.approve(id).await?;
    Ok(Json(response))
}

async fn reject_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.reject(id).await?;
    Ok(Json(response))
}

async fn complete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>, AppError> {
    let controller = OrderController::new(state.pool.clone());
    let response = controller.complete(id).await?;
    Ok(Json(response))
}
