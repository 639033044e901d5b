pub mod assignment_routes;
pub mod auth_routes;
pub mod booking_routes;
pub mod catalog_routes;
pub mod driver_routes;
pub mod order_routes;
pub mod settings_routes;
pub mod vehicle_routes;
