//! Repositorio de configuración financiera
//!
//! Una sola fila en service_settings con los costos por día que consume
//! el motor de precios.

use sqlx::PgPool;

use crate::services::pricing_service::ServiceCosts;
use crate::utils::errors::AppResult;

pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Costos vigentes; si el operador aún no los configuró, todos en cero
    pub async fn service_costs(&self) -> AppResult<ServiceCosts> {
        let costs = sqlx::query_as::<_, ServiceCosts>(
            "SELECT driver_per_day, matic_per_day, fuel_per_day FROM service_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        match costs {
            Some(costs) => Ok(costs),
            None => {
                tracing::warn!("service_settings sin configurar, usando costos en cero");
                Ok(ServiceCosts::zero())
            }
        }
    }

    pub async fn upsert_service_costs(&self, costs: &ServiceCosts) -> AppResult<ServiceCosts> {
        let updated = sqlx::query_as::<_, ServiceCosts>(
            r#"
            INSERT INTO service_settings (id, driver_per_day, matic_per_day, fuel_per_day)
            VALUES (1, $1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET driver_per_day = EXCLUDED.driver_per_day,
                matic_per_day = EXCLUDED.matic_per_day,
                fuel_per_day = EXCLUDED.fuel_per_day
            RETURNING driver_per_day, matic_per_day, fuel_per_day
            "#,
        )
        .bind(costs.driver_per_day)
        .bind(costs.matic_per_day)
        .bind(costs.fuel_per_day)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }
}
