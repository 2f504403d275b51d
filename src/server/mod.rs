//! HTTP server for closest-city
//!
//! Serves the search form, the JSON search API and the history API.

pub mod html;
pub mod routes;
pub mod state;

use crate::error::{Error, Result};
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Start the HTTP server on the configured address
///
/// Never returns unless the server shuts down
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.config.server_addr();
    run_on(&addr, state).await
}

/// Start the HTTP server on a specific address
pub async fn run_on(addr: &str, state: AppState) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Server(format!("Invalid server address: {}", e)))?;

    info!("Using {} gateway", state.gateway_name());
    let app = create_router(Arc::new(state));

    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Server(format!("Server error: {}", e)))?;

    Ok(())
}
