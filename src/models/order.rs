//! Modelo de Order
//!
//! La orden es el registro financiero del alquiler: nunca se borra
//! físicamente y su campo `status` solo lo muta el controlador de
//! ciclo de vida.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use super::vehicle::Transmission;

/// Estado de la orden - mapea al ENUM order_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Assigned,
    Approved,
    Rejected,
    Completed,
}

impl OrderStatus {
    /// `completed` y `rejected` son terminales
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Rejected)
    }
}

/// Nivel de servicio elegido por el cliente - mapea al ENUM service_level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "service_level", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ServiceLevel {
    SelfDrive,
    WithDriver,
    AllInclude,
}

impl ServiceLevel {
    /// `with-driver` y `all-include` requieren conductor asignado
    pub fn requires_driver(&self) -> bool {
        matches!(self, ServiceLevel::WithDriver | ServiceLevel::AllInclude)
    }

    /// Solo `all-include` incluye combustible
    pub fn includes_fuel(&self) -> bool {
        matches!(self, ServiceLevel::AllInclude)
    }
}

/// Método de pago - mapea al ENUM payment_method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_method", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    BankTransfer,
    Qris,
}

/// Estado del subflujo de aceptación de asignación - ENUM assignment_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "assignment_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentStatus {
    AwaitingResponse,
    Accepted,
    Rejected,
}

/// Ventana de reserva proyectada desde las órdenes no terminales
/// de un vehículo. Intervalo semiabierto `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct ReservationWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Order principal - mapea exactamente a la tabla orders
///
/// Los campos `car_*` son un snapshot tomado al crear la orden y no
/// cambian si el vehículo se edita después.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub order_code: String,
    pub vehicle_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub proposed_driver_id: Option<Uuid>,
    pub assignment_status: Option<AssignmentStatus>,
    pub car_name: String,
    pub car_type: String,
    pub car_fuel: String,
    pub car_transmission: Transmission,
    pub service_level: ServiceLevel,
    pub payment_method: PaymentMethod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_amount: Decimal,
    pub payment_proof_url: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
