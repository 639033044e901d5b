//! Repositorio de operadores (usuarios del dashboard)

use sqlx::PgPool;

use crate::models::Operator;
use crate::utils::errors::AppResult;

pub struct OperatorRepository {
    pool: PgPool,
}

impl OperatorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Operator>> {
        let operator = sqlx::query_as::<_, Operator>("SELECT * FROM operators WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(operator)
    }
}
