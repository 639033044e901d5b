//! Controlador del flujo público de reserva
//!
//! Orquesta cotización (motor de precios + disponibilidad), creación de
//! orden (con guardia transaccional en el repositorio) y carga del
//! comprobante de pago.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::booking_dto::{CreateBookingRequest, PaymentProofRequest, QuoteRequest, QuoteResponse};
use crate::dto::common_dto::ApiResponse;
use crate::dto::order_dto::OrderResponse;
use crate::models::UnitType;
use crate::repositories::order_repository::{NewOrder, OrderRepository};
use crate::repositories::settings_repository::SettingsRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::availability_service::AvailabilityService;
use crate::services::pricing_service::compute_price;
use crate::services::storage_service::{extension_for, PhotoStorage};
use crate::utils::errors::{AppError, AppResult};

pub struct BookingController {
    vehicles: VehicleRepository,
    orders: OrderRepository,
    settings: SettingsRepository,
    availability: AvailabilityService,
    storage: Arc<dyn PhotoStorage>,
}

/// Duración en días del rango semiabierto `[start, end)`
fn rental_duration(start: NaiveDate, end: NaiveDate) -> AppResult<i64> {
    let days = (end - start).num_days();
    if days < 1 {
        return Err(AppError::Validation(
            "La fecha de fin debe ser posterior a la fecha de inicio".to_string(),
        ));
    }
    Ok(days)
}

impl BookingController {
    pub fn new(pool: PgPool, storage: Arc<dyn PhotoStorage>) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            orders: OrderRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool.clone()),
            availability: AvailabilityService::new(OrderRepository::new(pool)),
            storage,
        }
    }

    pub async fn quote(&self, request: QuoteRequest) -> AppResult<QuoteResponse> {
        let days = rental_duration(request.start_date, request.end_date)?;

        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let costs = self.settings.service_costs().await?;
        let breakdown = compute_price(
            vehicle.price_per_day,
            vehicle.discount_percentage,
            vehicle.transmission,
            request.service_level,
            days,
            &costs,
        );

        // Unidad especial sin stock nunca está disponible
        let available = match vehicle.unit_type() {
            UnitType::Special { stock } if stock <= 0 => false,
            _ => {
                self.availability
                    .check(vehicle.id, request.start_date, request.end_date)
                    .await
            }
        };

        Ok(QuoteResponse::new(vehicle.id, days, available, breakdown))
    }

    pub async fn create(
        &self,
        request: CreateBookingRequest,
    ) -> AppResult<ApiResponse<OrderResponse>> {
        let days = rental_duration(request.start_date, request.end_date)?;

        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        // Sin precio no hay reserva (precio nulo = "todavía sin precio")
        if vehicle.price_per_day.is_none() {
            return Err(AppError::Validation(
                "El vehículo aún no tiene precio asignado y no es reservable".to_string(),
            ));
        }

        if let UnitType::Special { stock } = vehicle.unit_type() {
            if stock <= 0 {
                return Err(AppError::Unavailable(
                    "La unidad no tiene stock disponible".to_string(),
                ));
            }
        }

        let costs = self.settings.service_costs().await?;
        let breakdown = compute_price(
            vehicle.price_per_day,
            vehicle.discount_percentage,
            vehicle.transmission,
            request.service_level,
            days,
            &costs,
        );

        // La re-verificación de solapamiento ocurre dentro de la
        // transacción de creación (lock por vehículo)
        let order = self
            .orders
            .create(NewOrder {
                vehicle_id: vehicle.id,
                service_level: request.service_level,
                payment_method: request.payment_method,
                start_date: request.start_date,
                end_date: request.end_date,
                total_amount: breakdown.total,
                car_name: vehicle.name.clone(),
                car_type: vehicle.vehicle_type.clone(),
                car_fuel: vehicle.fuel.clone(),
                car_transmission: vehicle.transmission,
            })
            .await?;

        tracing::info!(
            "Orden {} creada para vehículo {} ({} días, total {})",
            order.order_code,
            vehicle.unit_code,
            days,
            order.total_amount
        );

        Ok(ApiResponse::success_with_message(
            order.into(),
            "Orden creada exitosamente".to_string(),
        ))
    }

    pub async fn upload_payment_proof(
        &self,
        order_id: Uuid,
        request: PaymentProofRequest,
    ) -> AppResult<ApiResponse<OrderResponse>> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Orden no encontrada".to_string()))?;

        if order.status.is_terminal() {
            return Err(AppError::Conflict(
                "La orden ya está cerrada y no admite comprobante".to_string(),
            ));
        }

        let extension = extension_for(&request.photo.content_type)?;
        let data = STANDARD
            .decode(request.photo.data_base64.as_bytes())
            .map_err(|e| AppError::Validation(format!("Contenido base64 inválido: {}", e)))?;

        let key = format!("payment-proofs/{}.{}", order.id, extension);
        let url = self
            .storage
            .store(&key, &data, &request.photo.content_type)
            .await?;

        let order = self.orders.set_payment_proof(order.id, url).await?;

        Ok(ApiResponse::success_with_message(
            order.into(),
            "Comprobante de pago cargado".to_string(),
        ))
    }
}
