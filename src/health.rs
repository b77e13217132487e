//! Liveness endpoint for external uptime probes (Render/Replit style pings).
//! Fully independent of moderation state; shares only the process lifetime.

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::core::Result;

async fn home() -> &'static str {
    "✅ Бот работает!"
}

async fn ping() -> &'static str {
    "pong"
}

pub fn router() -> Router {
    Router::new().route("/", get(home)).route("/ping", get(ping))
}

async fn serve(port: u16) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "liveness endpoint listening");
    axum::serve(listener, router()).await?;
    Ok(())
}

/// Spawns the liveness server. A bind or serve failure is logged and does not
/// take the bot down.
pub fn spawn(port: u16) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = serve(port).await {
            error!(error = %e, port, "liveness endpoint failed");
        }
    })
}
