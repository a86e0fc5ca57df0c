use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Build the application against an already migrated database.
pub fn app(db: sea_orm::DatabaseConnection, cfg: &configs::AuthConfig) -> Router {
    let state = auth::ServerState { db, auth: auth::ServerAuthConfig::from(cfg) };
    routes::build_router(build_cors(), state)
}

/// Resolves on Ctrl+C, or on SIGTERM where there is one.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "ctrl_c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "ctrl_c", "shutdown requested"),
        _ = terminate => info!(signal = "sigterm", "shutdown requested"),
    }
}

/// Load config, migrate, and serve until `shutdown` resolves; in-flight requests are drained.
pub async fn run_until<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let db = models::db::connect_and_migrate(&cfg.database).await?;
    let app = app(db.clone(), &cfg.auth);

    let addr = bind_addr(&cfg)?;
    info!(%addr, login_url = %cfg.auth.login_url, "http server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    db.close().await?;
    info!("http server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use configs::DatabaseConfig;

    #[tokio::test]
    async fn serving_stops_when_shutdown_resolves() -> anyhow::Result<()> {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        cfg.database = DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..DatabaseConfig::default()
        };
        cfg.auth.jwt_secret = "secret".into();
        run_until(cfg, async {}).await
    }

    #[test]
    fn bind_addr_rejects_garbage_hosts() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }
}
