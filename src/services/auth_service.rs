//! Servicio de autenticación de operadores
//!
//! Verifica credenciales con bcrypt y emite un JWT con rol `operator`.
//! El núcleo solo necesita la presencia del rol para habilitar las
//! transiciones administrativas.

use crate::repositories::operator_repository::OperatorRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig, ROLE_OPERATOR};

pub struct AuthService {
    operators: OperatorRepository,
    jwt: JwtConfig,
}

/// Token emitido tras un login exitoso
#[derive(Debug, serde::Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

impl AuthService {
    pub fn new(operators: OperatorRepository, jwt: JwtConfig) -> Self {
        Self { operators, jwt }
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<IssuedToken> {
        let operator = self
            .operators
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        let valid = bcrypt::verify(password, &operator.password_hash)
            .map_err(|e| AppError::Internal(format!("Error verificando contraseña: {}", e)))?;

        if !valid {
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        let token = generate_token(operator.id, ROLE_OPERATOR, &self.jwt)?;

        tracing::info!("Login de operador {}", operator.email);

        Ok(IssuedToken {
            token,
            expires_in: self.jwt.expiration,
        })
    }
}
