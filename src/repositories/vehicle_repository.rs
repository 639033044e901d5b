//! Repositorio de vehículos
//!
//! CRUD contra la tabla vehicles. El estado operativo (`status`) NO se
//! actualiza desde aquí: eso es exclusivo del store de transiciones.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Transmission, UnitKind, Vehicle};
use crate::utils::errors::{AppError, AppResult};

/// Datos para insertar un vehículo nuevo
#[derive(Debug)]
pub struct NewVehicle {
    pub id: Uuid,
    pub unit_code: String,
    pub brand: String,
    pub name: String,
    pub vehicle_type: String,
    pub transmission: Transmission,
    pub fuel: String,
    pub year: i32,
    pub passenger_capacity: i32,
    pub photo_key: Option<String>,
    pub photo_url: Option<String>,
    pub price_per_day: Option<Decimal>,
    pub discount_percentage: Option<Decimal>,
    pub unit_kind: UnitKind,
    pub stock: Option<i32>,
}

/// Campos editables de un vehículo
#[derive(Debug, Default)]
pub struct VehicleChanges {
    pub unit_code: Option<String>,
    pub brand: Option<String>,
    pub name: Option<String>,
    pub vehicle_type: Option<String>,
    pub transmission: Option<Transmission>,
    pub fuel: Option<String>,
    pub year: Option<i32>,
    pub passenger_capacity: Option<i32>,
    pub photo_key: Option<String>,
    pub photo_url: Option<String>,
    pub price_per_day: Option<Decimal>,
    pub discount_percentage: Option<Decimal>,
    pub stock: Option<i32>,
}

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_vehicle: NewVehicle) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, unit_code, brand, name, vehicle_type, transmission, fuel,
                year, passenger_capacity, photo_key, photo_url, price_per_day,
                discount_percentage, unit_kind, stock, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, 'available', now())
            RETURNING *
            "#,
        )
        .bind(new_vehicle.id)
        .bind(new_vehicle.unit_code)
        .bind(new_vehicle.brand)
        .bind(new_vehicle.name)
        .bind(new_vehicle.vehicle_type)
        .bind(new_vehicle.transmission)
        .bind(new_vehicle.fuel)
        .bind(new_vehicle.year)
        .bind(new_vehicle.passenger_capacity)
        .bind(new_vehicle.photo_key)
        .bind(new_vehicle.photo_url)
        .bind(new_vehicle.price_per_day)
        .bind(new_vehicle.discount_percentage)
        .bind(new_vehicle.unit_kind)
        .bind(new_vehicle.stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    pub async fn update(&self, id: Uuid, changes: VehicleChanges) -> AppResult<Vehicle> {
        // Obtener vehículo actual para completar los campos no enviados
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET unit_code = $2, brand = $3, name = $4, vehicle_type = $5,
                transmission = $6, fuel = $7, year = $8, passenger_capacity = $9,
                photo_key = $10, photo_url = $11, price_per_day = $12,
                discount_percentage = $13, stock = $14
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.unit_code.unwrap_or(current.unit_code))
        .bind(changes.brand.unwrap_or(current.brand))
        .bind(changes.name.unwrap_or(current.name))
        .bind(changes.vehicle_type.unwrap_or(current.vehicle_type))
        .bind(changes.transmission.unwrap_or(current.transmission))
        .bind(changes.fuel.unwrap_or(current.fuel))
        .bind(changes.year.unwrap_or(current.year))
        .bind(changes.passenger_capacity.unwrap_or(current.passenger_capacity))
        .bind(changes.photo_key.or(current.photo_key))
        .bind(changes.photo_url.or(current.photo_url))
        .bind(changes.price_per_day.or(current.price_per_day))
        .bind(changes.discount_percentage.or(current.discount_percentage))
        .bind(changes.stock.or(current.stock))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
