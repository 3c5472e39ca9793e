//! Static file server.
//!
//! Serves a directory over HTTP so browser front-ends can load exported
//! data without tripping cross-origin checks. Every response carries
//! `Access-Control-Allow-Origin: *`; preflight requests for `GET`, `POST`
//! and `OPTIONS` with a `Content-Type` header are accepted.
//!
//! Directory requests resolve to their `index.html`.

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    Router,
};
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the router serving `directory`.
pub fn router(directory: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .fallback_service(ServeDir::new(directory))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Run the server until Ctrl+C.
pub async fn run_server(config: &ServerConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    info!("Serving {} on {}", config.directory.display(), bind_addr);
    println!("🚀 Server listening on http://localhost:{}", config.port);
    println!("📁 Serving files from {}", config.directory.display());
    println!("🔗 Open: http://localhost:{}/index.html", config.port);
    println!("\nPress Ctrl+C to stop the server\n");

    axum::serve(listener, router(&config.directory))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("\n✋ Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler the server runs until the process is killed.
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
