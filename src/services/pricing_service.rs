//! Motor de precios
//!
//! Cálculo puro del precio de un alquiler: subtotal base, cargos por
//! conductor/combustible/transmisión matic y descuento. El descuento se
//! aplica solo al subtotal base, nunca a los cargos adicionales.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{ServiceLevel, Transmission};

/// Costos por día configurados por el operador (tabla service_settings)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceCosts {
    pub driver_per_day: Decimal,
    pub matic_per_day: Decimal,
    pub fuel_per_day: Decimal,
}

impl ServiceCosts {
    pub fn zero() -> Self {
        Self {
            driver_per_day: Decimal::ZERO,
            matic_per_day: Decimal::ZERO,
            fuel_per_day: Decimal::ZERO,
        }
    }
}

/// Desglose del precio calculado
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub rental_subtotal: Decimal,
    pub matic_fee: Decimal,
    pub driver_fee: Decimal,
    pub fuel_fee: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
}

/// Calcular el precio de un alquiler
///
/// `price_per_day` nulo se trata como 0 (vehículo aún sin precio);
/// `duration_days >= 1` lo garantiza el llamador.
pub fn compute_price(
    price_per_day: Option<Decimal>,
    discount_percentage: Option<Decimal>,
    transmission: Transmission,
    service_level: ServiceLevel,
    duration_days: i64,
    costs: &ServiceCosts,
) -> PriceBreakdown {
    let days = Decimal::from(duration_days);

    let rental_subtotal = price_per_day.unwrap_or(Decimal::ZERO) * days;

    let matic_fee = if transmission == Transmission::Matic {
        costs.matic_per_day * days
    } else {
        Decimal::ZERO
    };

    let driver_fee = if service_level.requires_driver() {
        costs.driver_per_day * days
    } else {
        Decimal::ZERO
    };

    let fuel_fee = if service_level.includes_fuel() {
        costs.fuel_per_day * days
    } else {
        Decimal::ZERO
    };

    let discount_amount = match discount_percentage {
        Some(pct) => rental_subtotal * pct / Decimal::from(100),
        None => Decimal::ZERO,
    };

    let total = rental_subtotal + matic_fee + driver_fee + fuel_fee - discount_amount;

    PriceBreakdown {
        rental_subtotal,
        matic_fee,
        driver_fee,
        fuel_fee,
        discount_amount,
        total,
    }
}
