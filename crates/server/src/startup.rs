use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use migration::{Migrator, MigratorTrait};
use service::store::seaorm::PgDatabase;
use service::store::Database;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Router over any backend; tests mount it on the in-memory store.
pub fn build_app<D: Database>(db: Arc<D>) -> Router {
    routes::build_router(AppState::new(db), build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        return;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Connect to PostgreSQL, migrate if configured, then serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let addr = bind_addr(&cfg)?;

    let conn = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.run_migrations {
        Migrator::up(&conn, None).await.map_err(|e| StartupError::Migration(e.to_string()))?;
        info!(event = "migrations_applied", "database schema is up to date");
    }

    let app = build_app(Arc::new(PgDatabase::new(conn)));

    info!(%addr, "starting warehouse server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!(event = "stopped", "server stopped");
    Ok(())
}
