//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, sus enums de estado y el tipo
//! de unidad. Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado operativo del vehículo - mapea al ENUM vehicle_status
///
/// Invariante: solo el controlador de ciclo de vida de órdenes puede
/// cambiar este estado, nunca la capa de presentación.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Available,
    Reserved,
    Rented,
}

/// Transmisión del vehículo - mapea al ENUM transmission
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "transmission", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    Manual,
    Matic,
}

/// Clase de unidad - mapea al ENUM unit_kind
///
/// `Ordinary` = disponibilidad por flota compartida,
/// `Special` = unidad de socio con stock contado.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "unit_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Ordinary,
    Special,
}

/// Tipo de unidad como variante etiquetada (la columna stock solo tiene
/// significado para unidades `special`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitType {
    Ordinary,
    Special { stock: i32 },
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
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
    // price_per_day nulo significa "todavía sin precio, no reservable"
    pub price_per_day: Option<Decimal>,
    pub discount_percentage: Option<Decimal>,
    pub unit_kind: UnitKind,
    pub stock: Option<i32>,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Tipo de unidad como variante etiquetada
    pub fn unit_type(&self) -> UnitType {
        match self.unit_kind {
            UnitKind::Ordinary => UnitType::Ordinary,
            UnitKind::Special => UnitType::Special {
                stock: self.stock.unwrap_or(0),
            },
        }
    }

    /// Las unidades de socio no usan el campo de estado de flota compartida
    pub fn is_partner_unit(&self) -> bool {
        self.unit_kind == UnitKind::Special
    }
}
