//! Profile forms front-end.
//!
//! Usage:
//!   STRAPI_API_URL=http://localhost:1337 forms-web --port 3000

use anyhow::{Context, Result};
use clap::Parser;
use forms_web::{AppState, Config};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(config.verbose);

    let state = AppState::from_config(&config).context("invalid content API configuration")?;
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, api = state.client().base_url(), "forms front-end listening");
    forms_web::run(listener, state).await.context("server stopped")
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
