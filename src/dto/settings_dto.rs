//! DTOs de configuración financiera

use rust_decimal::Decimal;
use serde::Deserialize;

/// Request para actualizar los costos por día
#[derive(Debug, Deserialize)]
pub struct UpdateServiceCostsRequest {
    pub driver_per_day: Decimal,
    pub matic_per_day: Decimal,
    pub fuel_per_day: Decimal,
}
