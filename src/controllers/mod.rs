pub mod assignment_controller;
pub mod auth_controller;
pub mod booking_controller;
pub mod driver_controller;
pub mod order_controller;
pub mod settings_controller;
pub mod vehicle_controller;
