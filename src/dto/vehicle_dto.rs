//! DTOs de vehículos

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common_dto::PhotoUpload;
use crate::models::{Transmission, UnitKind, Vehicle, VehicleStatus};

/// Request para crear un nuevo vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 20))]
    pub unit_code: String,

    #[validate(length(min = 2, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 2, max = 50))]
    pub vehicle_type: String,

    pub transmission: Transmission,

    #[validate(length(min = 2, max = 20))]
    pub fuel: String,

    #[validate(range(min = 1980, max = 2030))]
    pub year: i32,

    #[validate(range(min = 1, max = 20))]
    pub passenger_capacity: i32,

    pub price_per_day: Option<Decimal>,
    pub discount_percentage: Option<Decimal>,

    pub unit_kind: UnitKind,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,

    pub photo: Option<PhotoUpload>,
}

/// Request para actualizar un vehículo existente.
/// El estado operativo no es editable desde la API.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 20))]
    pub unit_code: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 2, max = 50))]
    pub vehicle_type: Option<String>,

    pub transmission: Option<Transmission>,

    #[validate(length(min = 2, max = 20))]
    pub fuel: Option<String>,

    #[validate(range(min = 1980, max = 2030))]
    pub year: Option<i32>,

    #[validate(range(min = 1, max = 20))]
    pub passenger_capacity: Option<i32>,

    pub price_per_day: Option<Decimal>,
    pub discount_percentage: Option<Decimal>,

    #[validate(range(min = 0))]
    pub stock: Option<i32>,

    pub photo: Option<PhotoUpload>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub unit_code: String,
    pub brand: String,
    pub name: String,
    pub vehicle_type: String,
    pub transmission: Transmission,
    pub fuel: String,
    pub year: i32,
    pub passenger_capacity: i32,
    pub photo_url: Option<String>,
    pub price_per_day: Option<Decimal>,
    pub discount_percentage: Option<Decimal>,
    pub unit_kind: UnitKind,
    pub stock: Option<i32>,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            unit_code: vehicle.unit_code,
            brand: vehicle.brand,
            name: vehicle.name,
            vehicle_type: vehicle.vehicle_type,
            transmission: vehicle.transmission,
            fuel: vehicle.fuel,
            year: vehicle.year,
            passenger_capacity: vehicle.passenger_capacity,
            photo_url: vehicle.photo_url,
            price_per_day: vehicle.price_per_day,
            discount_percentage: vehicle.discount_percentage,
            unit_kind: vehicle.unit_kind,
            stock: vehicle.stock,
            status: vehicle.status,
            created_at: vehicle.created_at,
        }
    }
}
