//! Repositorio de órdenes
//!
//! La creación de órdenes es la sección crítica por vehículo: se toma un
//! lock de fila (`SELECT ... FOR UPDATE`) sobre el vehículo y se vuelve a
//! verificar el solapamiento dentro de la misma transacción, de modo que
//! dos reservas concurrentes para el mismo rango serialicen y una reciba
//! `Unavailable`. La verificación de lectura previa (quote) es solo
//! consultiva.

use chrono::NaiveDate;
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    AssignmentStatus, Order, PaymentMethod, ReservationWindow, ServiceLevel, Transmission, Vehicle,
};
use crate::utils::errors::{AppError, AppResult};

/// Datos para crear una orden (el snapshot del vehículo viene del llamador)
#[derive(Debug)]
pub struct NewOrder {
    pub vehicle_id: Uuid,
    pub service_level: ServiceLevel,
    pub payment_method: PaymentMethod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_amount: Decimal,
    pub car_name: String,
    pub car_type: String,
    pub car_fuel: String,
    pub car_transmission: Transmission,
}

pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear una orden con guardia transaccional de disponibilidad.
    ///
    /// Si el rango candidato solapa con una reserva de una orden no
    /// terminal del mismo vehículo, la transacción se revierte y se
    /// devuelve `Unavailable`.
    pub async fn create(&self, new_order: NewOrder) -> AppResult<Order> {
        let mut tx = self.pool.begin().await?;

        // Lock de fila por vehículo: serializa creaciones concurrentes
        let _vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
            .bind(new_order.vehicle_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        // Re-verificación de solapamiento dentro de la transacción:
        // conflicto sii start < fin_candidato AND end > inicio_candidato
        let (conflicts,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM orders
            WHERE vehicle_id = $1
              AND status NOT IN ('rejected', 'completed')
              AND start_date < $2
              AND end_date > $3
            "#,
        )
        .bind(new_order.vehicle_id)
        .bind(new_order.end_date)
        .bind(new_order.start_date)
        .fetch_one(&mut *tx)
        .await?;

        if conflicts > 0 {
            return Err(AppError::Unavailable(
                "El vehículo ya está reservado en las fechas solicitadas".to_string(),
            ));
        }

        let order_code = format!("ORD-{}", rand::thread_rng().gen_range(10000..=99999));

        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                id, order_code, vehicle_id, car_name, car_type, car_fuel,
                car_transmission, service_level, payment_method, start_date,
                end_date, total_amount, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'pending', now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order_code)
        .bind(new_order.vehicle_id)
        .bind(new_order.car_name)
        .bind(new_order.car_type)
        .bind(new_order.car_fuel)
        .bind(new_order.car_transmission)
        .bind(new_order.service_level)
        .bind(new_order.payment_method)
        .bind(new_order.start_date)
        .bind(new_order.end_date)
        .bind(new_order.total_amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(order)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    pub async fn list(&self) -> AppResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Ventanas de reserva de las órdenes no terminales de un vehículo
    pub async fn reservation_windows(&self, vehicle_id: Uuid) -> AppResult<Vec<ReservationWindow>> {
        let windows = sqlx::query_as::<_, ReservationWindow>(
            r#"
            SELECT start_date, end_date FROM orders
            WHERE vehicle_id = $1 AND status NOT IN ('rejected', 'completed')
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(windows)
    }

    pub async fn set_payment_proof(&self, id: Uuid, url: String) -> AppResult<Order> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET payment_proof_url = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Orden no encontrada".to_string()))?;

        Ok(order)
    }

    /// Proponer un conductor: deja el subflujo en `awaiting-response`
    pub async fn stage_assignment(&self, id: Uuid, driver_id: Uuid) -> AppResult<Order> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET proposed_driver_id = $2, assignment_status = 'awaiting-response', updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Orden no encontrada".to_string()))?;

        Ok(order)
    }

    /// Registrar el desenlace del subflujo (usado para el rechazo; la
    /// aceptación se registra dentro de la transición atómica)
    pub async fn record_assignment_outcome(
        &self,
        id: Uuid,
        outcome: AssignmentStatus,
    ) -> AppResult<()> {
        sqlx::query("UPDATE orders SET assignment_status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(outcome)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
