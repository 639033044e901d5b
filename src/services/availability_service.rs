//! Verificación de disponibilidad
//!
//! Predicado de solapamiento sobre intervalos semiabiertos `[s, e)`:
//! una reserva existente entra en conflicto con el rango candidato
//! `[cs, ce)` sii `s < ce && e > cs`. Una reserva que termina exactamente
//! cuando empieza la nueva NO entra en conflicto.
//!
//! La verificación es consultiva en tiempo de lectura; la garantía real
//! contra carreras vive en la transacción de creación de órdenes
//! (ver `OrderRepository::create`).

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::ReservationWindow;
use crate::repositories::order_repository::OrderRepository;

/// ¿Se solapa la ventana existente con el rango candidato?
pub fn overlaps(window: &ReservationWindow, candidate_start: NaiveDate, candidate_end: NaiveDate) -> bool {
    window.start_date < candidate_end && window.end_date > candidate_start
}

/// ¿Está libre el rango candidato frente a todas las ventanas existentes?
pub fn is_available(
    windows: &[ReservationWindow],
    candidate_start: NaiveDate,
    candidate_end: NaiveDate,
) -> bool {
    !windows.iter().any(|w| overlaps(w, candidate_start, candidate_end))
}

/// Servicio de disponibilidad respaldado por el repositorio de órdenes
pub struct AvailabilityService {
    orders: OrderRepository,
}

impl AvailabilityService {
    pub fn new(orders: OrderRepository) -> Self {
        Self { orders }
    }

    /// Verificación consultiva para un vehículo y rango de fechas.
    ///
    /// Si la consulta de reservas falla, el valor seguro es `false`
    /// (tratar como no disponible), nunca disponible por defecto.
    pub async fn check(
        &self,
        vehicle_id: Uuid,
        candidate_start: NaiveDate,
        candidate_end: NaiveDate,
    ) -> bool {
        match self.orders.reservation_windows(vehicle_id).await {
            Ok(windows) => is_available(&windows, candidate_start, candidate_end),
            Err(e) => {
                tracing::error!(
                    "Error consultando reservas del vehículo {}: {} - se asume no disponible",
                    vehicle_id,
                    e
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(start: NaiveDate, end: NaiveDate) -> ReservationWindow {
        ReservationWindow {
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn test_toque_en_el_borde_no_es_conflicto() {
        // Reserva [2024-01-10, 2024-01-15); candidato [2024-01-15, 2024-01-20)
        let existing = vec![window(date(2024, 1, 10), date(2024, 1, 15))];
        assert!(is_available(&existing, date(2024, 1, 15), date(2024, 1, 20)));
        // Y al revés: candidato que termina donde empieza la reserva
        assert!(is_available(&existing, date(2024, 1, 5), date(2024, 1, 10)));
    }

    #[test]
    fn test_solapamiento_parcial_es_conflicto() {
        let existing = vec![window(date(2024, 1, 10), date(2024, 1, 15))];
        assert!(!is_available(&existing, date(2024, 1, 14), date(2024, 1, 20)));
        assert!(!is_available(&existing, date(2024, 1, 5), date(2024, 1, 11)));
    }

    #[test]
    fn test_rango_contenido_y_contenedor() {
        let existing = vec![window(date(2024, 1, 10), date(2024, 1, 15))];
        // candidato dentro de la reserva
        assert!(!is_available(&existing, date(2024, 1, 11), date(2024, 1, 12)));
        // candidato que envuelve la reserva
        assert!(!is_available(&existing, date(2024, 1, 1), date(2024, 1, 31)));
    }

    #[test]
    fn test_sin_reservas_siempre_disponible() {
        assert!(is_available(&[], date(2024, 1, 1), date(2024, 1, 2)));
    }

    #[test]
    fn test_multiples_ventanas() {
        let existing = vec![
            window(date(2024, 1, 1), date(2024, 1, 5)),
            window(date(2024, 1, 20), date(2024, 1, 25)),
        ];
        assert!(is_available(&existing, date(2024, 1, 5), date(2024, 1, 20)));
        assert!(!is_available(&existing, date(2024, 1, 4), date(2024, 1, 6)));
        assert!(!is_available(&existing, date(2024, 1, 24), date(2024, 1, 26)));
    }
}
