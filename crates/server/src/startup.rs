use std::{future::Future, sync::Arc};

use axum::Router;
use configs::AppConfig;
use service::store::{self, RecordStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

/// Browsers on other origins call this API directly.
fn build_cors() -> CorsLayer {
    CorsLayer::permissive()
}

/// Router over an already-built store.
pub fn build_app_with_store(store: Arc<dyn RecordStore>) -> Router {
    routes::build_router(AppState::new(store), build_cors())
}

/// Connect the configured store once and build the router around it.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let store = store::connect(&cfg.store).await?;
    Ok(build_app_with_store(store))
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl+C");
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
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    // 非 unix 平台只监听 Ctrl+C
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!(event = "shutdown_signal", "shutdown signal received, draining connections");
}

/// Public entry: build the app from `cfg` and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    // 存储只连接一次，所有请求共享
    let app = build_app(&cfg).await?;

    let listener = TcpListener::bind(cfg.server.bind_addr()).await?;
    let addr = listener.local_addr()?;
    info!(%addr, port = addr.port(), "Server running on port {}", addr.port());

    serve(listener, app, shutdown_signal()).await
}
