use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use configs::{AppConfig, ServerConfig};
use tracing::{info, warn};

use service::signature::{
    repository::{SeaOrmSignatureRepository, SignatureRepository},
    service::PetitionService,
};

use crate::{errors::StartupError, routes, state::ServerState};

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}:{}: {e}", server.host, server.port)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; shutdown only via process kill");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: connect the store, build the app and serve until Ctrl+C.
///
/// An unreachable store is fatal; the server never starts without one.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::StoreUnreachable(e.to_string()))?;
    models::db::ensure_schema(&db)
        .await
        .map_err(|e| StartupError::StoreUnreachable(e.to_string()))?;

    let repo: Arc<dyn SignatureRepository> = Arc::new(SeaOrmSignatureRepository::new(
        db.clone(),
        Duration::from_secs(cfg.database.statement_timeout_secs),
    ));
    let petition = PetitionService::new(repo, cfg.petition.clone(), cfg.server.public_url.clone());

    // the login subsystem lives outside this crate; nothing is mounted by default
    let app = routes::build_router(ServerState::new(petition), Router::new());

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, public_url = %cfg.server.public_url, "starting petition server");
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| StartupError::Any(e.into()))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;

    db.close().await.map_err(|e| StartupError::Any(e.into()))?;
    info!(event = "store_closed", "signature store connection pool closed");
    Ok(())
}
