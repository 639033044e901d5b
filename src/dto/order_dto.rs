//! DTOs de órdenes y del subflujo de asignación

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    AssignmentStatus, Order, OrderStatus, PaymentMethod, ServiceLevel, Transmission,
};
use crate::services::assignment_service::AssignmentDecision;

/// Response de orden para la API
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_code: String,
    pub vehicle_id: Uuid,
    pub driver_id: Option<Uuid>,
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
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            order_code: order.order_code,
            vehicle_id: order.vehicle_id,
            driver_id: order.driver_id,
            assignment_status: order.assignment_status,
            car_name: order.car_name,
            car_type: order.car_type,
            car_fuel: order.car_fuel,
            car_transmission: order.car_transmission,
            service_level: order.service_level,
            payment_method: order.payment_method,
            start_date: order.start_date,
            end_date: order.end_date,
            total_amount: order.total_amount,
            payment_proof_url: order.payment_proof_url,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

/// Request para asignar o proponer conductor
#[derive(Debug, Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Uuid,
}

/// Request del conductor respondiendo la asignación
#[derive(Debug, Deserialize)]
pub struct RespondAssignmentRequest {
    pub decision: AssignmentDecision,
}

/// Response de una transición de estado
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub order_id: Uuid,
    pub status: OrderStatus,
}
