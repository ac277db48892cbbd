//! Stand-alone mock content API.
//!
//! Usage:
//!   PORT=1337 mock-server

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let addr = mock_server::listen_addr(std::env::var("PORT").ok().as_deref());
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "mock content API listening");
    mock_server::run(listener).await
}
