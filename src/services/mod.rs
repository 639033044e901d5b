pub mod assignment_service;
pub mod auth_service;
pub mod availability_service;
pub mod lifecycle_service;
pub mod pricing_service;
pub mod storage_service;
