//! Controlador de configuración financiera

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::common_dto::ApiResponse;
use crate::dto::settings_dto::UpdateServiceCostsRequest;
use crate::repositories::settings_repository::SettingsRepository;
use crate::services::pricing_service::ServiceCosts;
use crate::utils::errors::{AppError, AppResult};

pub struct SettingsController {
    repository: SettingsRepository,
}

impl SettingsController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SettingsRepository::new(pool),
        }
    }

    pub async fn service_costs(&self) -> AppResult<ServiceCosts> {
        self.repository.service_costs().await
    }

    pub async fn update_service_costs(
        &self,
        request: UpdateServiceCostsRequest,
    ) -> AppResult<ApiResponse<ServiceCosts>> {
        for (field, value) in [
            ("driver_per_day", request.driver_per_day),
            ("matic_per_day", request.matic_per_day),
            ("fuel_per_day", request.fuel_per_day),
        ] {
            if value < Decimal::ZERO {
                return Err(AppError::Validation(format!(
                    "{} no puede ser negativo",
                    field
                )));
            }
        }

        let costs = self
            .repository
            .upsert_service_costs(&ServiceCosts {
                driver_per_day: request.driver_per_day,
                matic_per_day: request.matic_per_day,
                fuel_per_day: request.fuel_per_day,
            })
            .await?;

        Ok(ApiResponse::success_with_message(
            costs,
            "Costos de servicio actualizados".to_string(),
        ))
    }
}
