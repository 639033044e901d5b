//! Store de transiciones contra PostgreSQL
//!
//! Implementa `TransitionStore` aplicando todos los efectos de una
//! transición (orden, vehículo, conductores) en UNA transacción: si
//! cualquier paso falla, nada queda persistido.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::services::lifecycle_service::{OrderSnapshot, TransitionEffects, TransitionStore};
use crate::utils::errors::{AppError, AppResult};

pub struct PgTransitionStore {
    pool: PgPool,
}

impl PgTransitionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransitionStore for PgTransitionStore {
    async fn load(&self, order_id: Uuid) -> AppResult<OrderSnapshot> {
        let snapshot = sqlx::query_as::<_, OrderSnapshot>(
            r#"
            SELECT o.id AS order_id,
                   o.vehicle_id,
                   o.status,
                   o.service_level,
                   o.driver_id,
                   (v.unit_kind = 'special') AS is_partner_unit
            FROM orders o
            JOIN vehicles v ON v.id = o.vehicle_id
            WHERE o.id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Orden no encontrada".to_string()))?;

        Ok(snapshot)
    }

    async fn apply(&self, order_id: Uuid, effects: &TransitionEffects) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        // Estado de la orden (y conductor/desenlace si corresponde)
        sqlx::query(
            r#"
            UPDATE orders
            SET status = $2,
                driver_id = COALESCE($3, driver_id),
                assignment_status = COALESCE($4, assignment_status),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(order_id)
        .bind(effects.order_status)
        .bind(effects.set_order_driver)
        .bind(effects.assignment_status)
        .execute(&mut *tx)
        .await?;

        // Estado del vehículo
        if let Some(vehicle_status) = effects.vehicle_status {
            sqlx::query(
                "UPDATE vehicles SET status = $2 WHERE id = (SELECT vehicle_id FROM orders WHERE id = $1)",
            )
            .bind(order_id)
            .bind(vehicle_status)
            .execute(&mut *tx)
            .await?;
        }

        // Liberar conductor anterior
        if let Some(previous) = effects.release_driver {
            sqlx::query("UPDATE drivers SET status = 'available' WHERE id = $1")
                .bind(previous)
                .execute(&mut *tx)
                .await?;
        }

        // Tomar conductor nuevo: la condición de estado hace cumplir que
        // un conductor solo puede estar ligado a una orden no terminal
        if let Some(next) = effects.engage_driver {
            let result = sqlx::query(
                "UPDATE drivers SET status = 'on-duty' WHERE id = $1 AND status = 'available'",
            )
            .bind(next)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // tx se descarta sin commit: rollback completo
                return Err(AppError::Conflict(
                    "El conductor no está disponible".to_string(),
                ));
            }
        }

        tx.commit().await?;

        Ok(())
    }
}
