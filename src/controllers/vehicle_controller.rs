//! Controlador de vehículos del dashboard

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::{ApiResponse, PhotoUpload};
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::models::{UnitKind, VehicleStatus};
use crate::repositories::vehicle_repository::{NewVehicle, VehicleChanges, VehicleRepository};
use crate::services::storage_service::{extension_for, PhotoStorage};
use crate::utils::errors::{AppError, AppResult};

pub struct VehicleController {
    repository: VehicleRepository,
    storage: Arc<dyn PhotoStorage>,
}

fn validate_discount(discount: Option<Decimal>) -> AppResult<()> {
    if let Some(pct) = discount {
        if pct < Decimal::ZERO || pct > Decimal::from(100) {
            return Err(AppError::Validation(
                "El descuento debe estar entre 0 y 100".to_string(),
            ));
        }
    }
    Ok(())
}

impl VehicleController {
    pub fn new(pool: PgPool, storage: Arc<dyn PhotoStorage>) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
            storage,
        }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        request.validate()?;
        validate_discount(request.discount_percentage)?;

        if request.unit_kind == UnitKind::Special && request.stock.is_none() {
            return Err(AppError::Validation(
                "Las unidades especiales requieren stock".to_string(),
            ));
        }

        let id = Uuid::new_v4();

        let (photo_key, photo_url) = match &request.photo {
            Some(photo) => {
                let (key, url) = self.upload_photo(id, photo).await?;
                (Some(key), Some(url))
            }
            None => (None, None),
        };

        let vehicle = self
            .repository
            .create(NewVehicle {
                id,
                unit_code: request.unit_code,
                brand: request.brand,
                name: request.name,
                vehicle_type: request.vehicle_type,
                transmission: request.transmission,
                fuel: request.fuel,
                year: request.year,
                passenger_capacity: request.passenger_capacity,
                photo_key,
                photo_url,
                price_per_day: request.price_per_day,
                discount_percentage: request.discount_percentage,
                unit_kind: request.unit_kind,
                stock: request.stock,
            })
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<VehicleResponse> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        Ok(vehicle.into())
    }

    pub async fn list(&self) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self.repository.list().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        request.validate()?;
        validate_discount(request.discount_percentage)?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let (photo_key, photo_url) = match &request.photo {
            Some(photo) => {
                let (key, url) = self.upload_photo(id, photo).await?;
                // Si la extensión cambió, la key anterior queda huérfana
                if let Some(old_key) = current.photo_key.as_deref() {
                    if old_key != key {
                        self.storage.delete(old_key).await?;
                    }
                }
                (Some(key), Some(url))
            }
            None => (None, None),
        };

        let vehicle = self
            .repository
            .update(
                id,
                VehicleChanges {
                    unit_code: request.unit_code,
                    brand: request.brand,
                    name: request.name,
                    vehicle_type: request.vehicle_type,
                    transmission: request.transmission,
                    fuel: request.fuel,
                    year: request.year,
                    passenger_capacity: request.passenger_capacity,
                    photo_key,
                    photo_url,
                    price_per_day: request.price_per_day,
                    discount_percentage: request.discount_percentage,
                    stock: request.stock,
                },
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    /// Eliminar un vehículo; borra su foto almacenada como efecto colateral
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.status != VehicleStatus::Available {
            return Err(AppError::Conflict(
                "No se puede eliminar un vehículo reservado o alquilado".to_string(),
            ));
        }

        if let Some(key) = vehicle.photo_key.as_deref() {
            self.storage.delete(key).await?;
        }

        self.repository.delete(id).await?;

        tracing::info!("Vehículo {} eliminado", vehicle.unit_code);
        Ok(())
    }

    async fn upload_photo(&self, vehicle_id: Uuid, photo: &PhotoUpload) -> AppResult<(String, String)> {
        let extension = extension_for(&photo.content_type)?;
        let data = STANDARD
            .decode(photo.data_base64.as_bytes())
            .map_err(|e| AppError::Validation(format!("Contenido base64 inválido: {}", e)))?;

        let key = format!("vehicles/{}.{}", vehicle_id, extension);
        let url = self.storage.store(&key, &data, &photo.content_type).await?;

        Ok((key, url))
    }
}
