//! Repositorio de conductores
//!
//! El estado (`status`) solo lo muta el store de transiciones.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Driver, DriverStatus};
use crate::utils::errors::{AppError, AppResult};

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: String, address: String, phone: String) -> AppResult<Driver> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (id, name, address, phone, status, created_at)
            VALUES ($1, $2, $3, $4, 'available', now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(address)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    pub async fn list(&self) -> AppResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>("SELECT * FROM drivers ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(drivers)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        address: Option<String>,
        phone: Option<String>,
    ) -> AppResult<Driver> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET name = $2, address = $3, phone = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name.unwrap_or(current.name))
        .bind(address.unwrap_or(current.address))
        .bind(phone.unwrap_or(current.phone))
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let driver = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        // Un conductor en servicio está ligado a una orden no terminal
        if driver.status == DriverStatus::OnDuty {
            return Err(AppError::Conflict(
                "No se puede eliminar un conductor en servicio".to_string(),
            ));
        }

        sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
