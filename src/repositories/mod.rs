pub mod assignment_store;
pub mod driver_repository;
pub mod operator_repository;
pub mod order_repository;
pub mod settings_repository;
pub mod transition_store;
pub mod vehicle_repository;
