//! Middleware de autenticación por roles

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{extract_token_from_header, verify_token, JwtConfig, ROLE_DRIVER, ROLE_OPERATOR};

/// Middleware que exige un token de operador válido
pub async fn require_operator(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token no proporcionado".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &state.jwt)?;

    if claims.role != ROLE_OPERATOR {
        return Err(AppError::Forbidden(
            "Se requiere rol de operador".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Extraer la identidad del conductor autenticado desde los headers
pub fn driver_claims(headers: &HeaderMap, jwt: &JwtConfig) -> AppResult<Uuid> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token no proporcionado".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, jwt)?;

    if claims.role != ROLE_DRIVER {
        return Err(AppError::Forbidden(
            "Se requiere rol de conductor".to_string(),
        ));
    }

    Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))
}
