//! Server setup and initialization
//!
//! Provides the application builder and the server runner.

use std::sync::Arc;

use axum::Router;
use payfeed_common::{AppConfig, AppError, JwtService};
use payfeed_core::SnowflakeGenerator;
use payfeed_db::{
    create_pool, run_migrations, PgPayoutRepository, PgPostRepository, PgRateRepository,
    PgUserRepository,
};
use payfeed_media::build_media_store;
use payfeed_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::middleware::apply_middleware_with_config;
use crate::response::route_not_found;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();

    let api = apply_middleware_with_config(
        create_router(&config.media),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    Ok(api
        .merge(health_routes())
        .fallback(route_not_found)
        .with_state(state))
}

/// Connect to dependencies, run migrations, and assemble the state
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool, &config.database.migrations_dir)
        .await
        .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
    info!(dir = %config.database.migrations_dir, "Migrations applied");

    let media_store =
        build_media_store(&config.media).map_err(|e| AppError::Config(e.to_string()))?;
    info!(backend = media_store.backend(), "Media store ready");

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.expiry_seconds,
    ));

    let snowflake_generator = Arc::new(
        SnowflakeGenerator::new(config.snowflake.worker_id)
            .map_err(|e| AppError::Config(format!("SNOWFLAKE_WORKER_ID: {e}")))?,
    );

    let service_context = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
        .rate_repo(Arc::new(PgRateRepository::new(pool.clone())))
        .payout_repo(Arc::new(PgPayoutRepository::new(pool.clone())))
        .media_store(media_store)
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .default_rates(config.rates.clone())
        .admin_config(config.admin.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool))
}

/// Serve `app` on `listener` until Ctrl+C or SIGTERM
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;
    info!("Server listening on http://{}", addr);

    serve(listener, app).await?;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }

    info!("Shutting down gracefully...");
}
