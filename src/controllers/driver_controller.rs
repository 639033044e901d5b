//! Controlador de conductores del dashboard

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::driver_dto::{CreateDriverRequest, DriverResponse, UpdateDriverRequest};
use crate::repositories::driver_repository::DriverRepository;
use crate::utils::errors::{AppError, AppResult};

pub struct DriverController {
    repository: DriverRepository,
}

impl DriverController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DriverRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateDriverRequest,
    ) -> AppResult<ApiResponse<DriverResponse>> {
        request.validate()?;

        let driver = self
            .repository
            .create(request.name, request.address, request.phone)
            .await?;

        Ok(ApiResponse::success_with_message(
            driver.into(),
            "Conductor creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<DriverResponse> {
        let driver = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        Ok(driver.into())
    }

    pub async fn list(&self) -> AppResult<Vec<DriverResponse>> {
        let drivers = self.repository.list().await?;
        Ok(drivers.into_iter().map(DriverResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateDriverRequest,
    ) -> AppResult<ApiResponse<DriverResponse>> {
        request.validate()?;

        let driver = self
            .repository
            .update(id, request.name, request.address, request.phone)
            .await?;

        Ok(ApiResponse::success_with_message(
            driver.into(),
            "Conductor actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.delete(id).await
    }
}
