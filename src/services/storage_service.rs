//! Almacenamiento de objetos (fotos de vehículos, comprobantes de pago)
//!
//! Backend S3-compatible detrás de un trait para poder inyectar fakes en
//! tests. Solo se aceptan imágenes PNG/JPEG/WEBP.

use async_trait::async_trait;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::Region;

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::{AppError, AppResult};

/// Extensión de archivo para un content type permitido
pub fn extension_for(content_type: &str) -> AppResult<&'static str> {
    match content_type {
        "image/png" => Ok("png"),
        "image/jpeg" => Ok("jpg"),
        "image/webp" => Ok("webp"),
        other => Err(AppError::Validation(format!(
            "Formato de imagen no soportado: {} (se acepta PNG, JPEG o WEBP)",
            other
        ))),
    }
}

/// Colaborador de almacenamiento de fotos
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Guardar bytes y devolver la URL pública
    async fn store(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<String>;
    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// Backend S3-compatible (R2 u otro)
pub struct S3PhotoStorage {
    bucket: Box<Bucket>,
    public_url: String,
}

impl S3PhotoStorage {
    pub fn new(config: &EnvironmentConfig) -> AppResult<Self> {
        let region = Region::Custom {
            region: "auto".to_string(),
            endpoint: format!(
                "https://{}.r2.cloudflarestorage.com",
                config.storage_account_id
            ),
        };

        let credentials = Credentials::new(
            Some(&config.storage_access_key),
            Some(&config.storage_secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Storage(format!("Credenciales de storage inválidas: {}", e)))?;

        let bucket = Bucket::new(&config.storage_bucket, region, credentials)
            .map_err(|e| AppError::Storage(format!("Error creando bucket: {}", e)))?;

        Ok(Self {
            bucket,
            public_url: config.storage_public_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PhotoStorage for S3PhotoStorage {
    async fn store(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<String> {
        // Validar formato antes de subir
        extension_for(content_type)?;

        self.bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Error subiendo {}: {}", key, e)))?;

        tracing::info!("Objeto subido: key={}, {} bytes", key, data.len());
        Ok(format!("{}/{}", self.public_url, key))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.bucket
            .delete_object(key)
            .await
            .map_err(|e| AppError::Storage(format!("Error eliminando {}: {}", key, e)))?;

        tracing::info!("Objeto eliminado: key={}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatos_permitidos() {
        assert_eq!(extension_for("image/png").unwrap(), "png");
        assert_eq!(extension_for("image/jpeg").unwrap(), "jpg");
        assert_eq!(extension_for("image/webp").unwrap(), "webp");
    }

    #[test]
    fn test_formato_rechazado() {
        assert!(matches!(
            extension_for("image/gif"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            extension_for("application/pdf"),
            Err(AppError::Validation(_))
        ));
    }
}
