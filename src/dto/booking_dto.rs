//! DTOs del flujo público de reserva

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common_dto::PhotoUpload;
use crate::models::{PaymentMethod, ServiceLevel};
use crate::services::pricing_service::PriceBreakdown;

/// Request de cotización
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub service_level: ServiceLevel,
}

/// Response de cotización
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub vehicle_id: Uuid,
    pub duration_days: i64,
    pub available: bool,
    pub rental_subtotal: Decimal,
    pub matic_fee: Decimal,
    pub driver_fee: Decimal,
    pub fuel_fee: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
}

impl QuoteResponse {
    pub fn new(
        vehicle_id: Uuid,
        duration_days: i64,
        available: bool,
        breakdown: PriceBreakdown,
    ) -> Self {
        Self {
            vehicle_id,
            duration_days,
            available,
            rental_subtotal: breakdown.rental_subtotal,
            matic_fee: breakdown.matic_fee,
            driver_fee: breakdown.driver_fee,
            fuel_fee: breakdown.fuel_fee,
            discount_amount: breakdown.discount_amount,
            total: breakdown.total,
        }
    }
}

/// Request para crear una orden desde el storefront
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub service_level: ServiceLevel,
    pub payment_method: PaymentMethod,
}

/// Request para subir el comprobante de pago
#[derive(Debug, Deserialize)]
pub struct PaymentProofRequest {
    #[serde(flatten)]
    pub photo: PhotoUpload,
}
