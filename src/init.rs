use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::routes::{self, AppState};
use crate::songlink::SonglinkClient;

/// Wires up configuration, the shared http client and the router, then
/// serves until ctrl-c.
pub async fn init() -> anyhow::Result<()> {
    let config = Config::from_env();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let songlink = SonglinkClient::new(config.songlink_api_base.clone(), http.clone());

    let port = config.port;
    let state = Arc::new(AppState {
        config,
        songlink,
        http,
    });

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("finished initializing! listening on port {port}.");

    axum::serve(listener, routes::build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received. goodbye!");
}
