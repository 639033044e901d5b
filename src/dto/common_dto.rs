//! DTOs compartidos

use serde::{Deserialize, Serialize};

/// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

/// Carga de imagen embebida en JSON (base64)
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoUpload {
    pub content_type: String,
    pub data_base64: String,
}
