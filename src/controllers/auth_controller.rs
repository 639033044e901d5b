//! Controlador de autenticación

use sqlx::PgPool;
use validator::Validate;

use crate::dto::auth_dto::LoginRequest;
use crate::repositories::operator_repository::OperatorRepository;
use crate::services::auth_service::{AuthService, IssuedToken};
use crate::utils::errors::AppResult;
use crate::utils::jwt::JwtConfig;

pub struct AuthController {
    service: AuthService,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self {
            service: AuthService::new(OperatorRepository::new(pool), jwt),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<IssuedToken> {
        request.validate()?;
        self.service.login(&request.email, &request.password).await
    }
}
