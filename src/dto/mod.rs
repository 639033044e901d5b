pub mod auth_dto;
pub mod booking_dto;
pub mod common_dto;
pub mod driver_dto;
pub mod order_dto;
pub mod settings_dto;
pub mod vehicle_dto;
