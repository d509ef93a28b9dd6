//! # Keep-Alive Endpoint
//!
//! Minimal HTTP surface for free-tier hosts that terminate processes with
//! no inbound traffic: an external pinger hits `/` and keeps the bot
//! resident. No interaction with the bot itself.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

/// Static liveness body probed by the external pinger.
async fn home() -> &'static str {
    "Бот работает!"
}

/// The keep-alive router: `GET /` answers the liveness body.
pub fn router() -> Router {
    Router::new().route("/", get(home))
}

/// Serve the keep-alive endpoint on `0.0.0.0:<port>` until the process
/// exits.
pub async fn serve(port: u16) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding keep-alive listener on port {port}"))?;
    info!(port, "Keep-alive endpoint listening");
    axum::serve(listener, router())
        .await
        .context("keep-alive server failed")?;
    Ok(())
}
