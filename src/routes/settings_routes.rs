//! Rutas de configuración financiera (requieren operador)

use axum::{
    extract::State,
    middleware,
    routing::{get, put},
    Json, Router,
};

use crate::controllers::settings_controller::SettingsController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::settings_dto::UpdateServiceCostsRequest;
use crate::middleware::auth::require_operator;
use crate::services::pricing_service::ServiceCosts;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_settings_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/service-costs", get(get_service_costs))
        .route("/service-costs", put(update_service_costs))
        .route_layer(middleware::from_fn_with_state(state, require_operator))
}

async fn get_service_costs(
    State(state): State<AppState>,
) -> Result<Json<ServiceCosts>, AppError> {
    let controller = SettingsController::new(state.pool.clone());
    let response = controller.service_costs().await?;
    Ok(Json(response))
}

async fn update_service_costs(
    State(state): State<AppState>,
    Json(request): Json<UpdateServiceCostsRequest>,
) -> Result<Json<ApiResponse<ServiceCosts>>, AppError> {
    let controller = SettingsController::new(state.pool.clone());
    let response = controller.update_service_costs(request).await?;
    Ok(Json(response))
}
