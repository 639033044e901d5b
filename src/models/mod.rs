pub mod driver;
pub mod operator;
pub mod order;
pub mod vehicle;

pub use driver::{Driver, DriverStatus};
pub use operator::Operator;
pub use order::{AssignmentStatus, Order, OrderStatus, PaymentMethod, ReservationWindow, ServiceLevel};
pub use vehicle::{Transmission, UnitKind, UnitType, Vehicle, VehicleStatus};
