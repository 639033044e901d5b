//! Rutas públicas del flujo de reserva

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{CreateBookingRequest, PaymentProofRequest, QuoteRequest, QuoteResponse};
use crate::dto::common_dto::ApiResponse;
use crate::dto::order_dto::OrderResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(quote))
        .route("/", post(create_booking))
        .route("/:id/payment-proof", post(upload_payment_proof))
}

async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.storage.clone());
    let response = controller.quote(request).await?;
    Ok(Json(response))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.storage.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn upload_payment_proof(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PaymentProofRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.storage.clone());
    let response = controller.upload_payment_proof(id, request).await?;
    Ok(Json(response))
}
