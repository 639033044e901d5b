//! Modelo de Driver

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del conductor - mapea al ENUM driver_status
///
/// Invariante: a lo sumo una orden no terminal puede tener al conductor
/// en `on-duty`; el estado lo administra el controlador de ciclo de vida.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "driver_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DriverStatus {
    Available,
    OnDuty,
}

/// Driver principal - mapea exactamente a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub status: DriverStatus,
    pub created_at: DateTime<Utc>,
}
