use std::net::SocketAddr;
use std::path::Path;

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;
use service::runtime;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address: {e}")))
}

/// Router and state for `cfg`, without binding anything.
pub fn build_app(cfg: &AppConfig) -> Router {
    let state = ServerState::from_storage_config(&cfg.storage);
    routes::build_router(state, build_cors())
}

/// Serve `app` on an already bound listener until the future is dropped.
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    axum::serve(listener, app).await?;
    Ok(())
}

/// Public entry: build the app from `cfg` and run the HTTP server
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::ensure_storage_dir(Path::new(&cfg.storage.path)).await?;

    let app = build_app(&cfg);
    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await.map_err(|source| StartupError::Bind {
        addr: addr.to_string(),
        source,
    })?;
    info!(
        %addr,
        catalog = %cfg.storage.path,
        id_policy = ?cfg.storage.id_policy,
        failure_policy = ?cfg.storage.failure_policy,
        "catalog server listening on port {}",
        addr.port()
    );
    serve(listener, app).await
}
