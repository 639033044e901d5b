use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use tokio::signal;
use tracing::{error, info};

use car_rental::config::environment::EnvironmentConfig;
use car_rental::database::connection::create_pool;
use car_rental::middleware::cors::cors_middleware;
use car_rental::routes;
use car_rental::services::storage_service::S3PhotoStorage;
use car_rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Car Rental - API de alquiler de vehículos");
    info!("============================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Inicializar almacenamiento de fotos
    let storage = match S3PhotoStorage::new(&config) {
        Ok(storage) => {
            info!("✅ Almacenamiento de objetos configurado");
            Arc::new(storage)
        }
        Err(e) => {
            error!("❌ Error configurando el almacenamiento: {}", e);
            return Err(anyhow::anyhow!("Error de almacenamiento: {}", e));
        }
    };

    let state = AppState::new(pool, config, storage);

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        .nest("/api/catalog", routes::catalog_routes::create_catalog_router())
        .nest("/api/booking", routes::booking_routes::create_booking_router())
        .nest(
            "/api/vehicle",
            routes::vehicle_routes::create_vehicle_router(state.clone()),
        )
        .nest(
            "/api/driver",
            routes::driver_routes::create_driver_router(state.clone()),
        )
        .nest(
            "/api/order",
            routes::order_routes::create_order_router(state.clone()),
        )
        .nest(
            "/api/assignment",
            routes::assignment_routes::create_assignment_router(),
        )
        .nest(
            "/api/settings",
            routes::settings_routes::create_settings_router(state.clone()),
        )
        .layer(cors_middleware())
        .with_state(state.clone());

    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Autenticación:");
    info!("   POST /api/auth/login - Login de operador");
    info!("🛒 Storefront público:");
    info!("   GET  /api/catalog/vehicles - Listar catálogo");
    info!("   GET  /api/catalog/vehicles/:id - Detalle de vehículo");
    info!("   POST /api/booking/quote - Cotizar reserva");
    info!("   POST /api/booking - Crear orden");
    info!("   POST /api/booking/:id/payment-proof - Subir comprobante");
    info!("🚗 Dashboard - Vehículos:");
    info!("   POST /api/vehicle - Crear vehículo");
    info!("   GET  /api/vehicle - Listar vehículos");
    info!("   GET  /api/vehicle/:id - Obtener vehículo");
    info!("   PUT  /api/vehicle/:id - Actualizar vehículo");
    info!("   DELETE /api/vehicle/:id - Eliminar vehículo");
    info!("🧑 Dashboard - Conductores:");
    info!("   POST /api/driver - Crear conductor");
    info!("   GET  /api/driver - Listar conductores");
    info!("   GET  /api/driver/:id - Obtener conductor");
    info!("   PUT  /api/driver/:id - Actualizar conductor");
    info!("   DELETE /api/driver/:id - Eliminar conductor");
    info!("📋 Dashboard - Órdenes:");
    info!("   GET  /api/order - Listar órdenes");
    info!("   GET  /api/order/:id - Obtener orden");
    info!("   POST /api/order/:id/assign-driver - Asignar conductor");
    info!("   POST /api/order/:id/propose-driver - Proponer conductor");
    info!("   POST /api/order/:id/approve - Aprobar orden");
    info!("   POST /api/order/:id/reject - Rechazar orden");
    info!("   POST /api/order/:id/complete - Completar orden");
    info!("🧾 Conductor - Asignaciones:");
    info!("   GET  /api/assignment/:order_id - Asignación propuesta");
    info!("   POST /api/assignment/:order_id/respond - Aceptar o rechazar");
    info!("⚙️  Dashboard - Configuración:");
    info!("   GET  /api/settings/service-costs - Costos de servicio");
    info!("   PUT  /api/settings/service-costs - Actualizar costos");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
