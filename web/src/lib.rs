//! HTTP front-end for the profile and login forms.
//!
//! # Overview
//! Serves the form pages and their POST endpoints. Submissions are decoded
//! here, validated and forwarded by `forms_core`, and executed against the
//! content API through a reqwest transport.

pub mod config;
pub mod decode;
pub mod pages;
pub mod routes;
pub mod state;
pub mod transport;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tokio::net::TcpListener;

pub use config::Config;
pub use state::{AppState, Settings};
pub use transport::ReqwestTransport;

pub fn app(state: AppState) -> Router {
    let body_limit = state.settings().max_body_bytes;
    Router::new()
        .route("/", get(routes::profile_form).post(routes::submit_profile))
        .route(
            "/simple-form",
            get(routes::simple_form).post(routes::submit_simple_form),
        )
        .route(
            "/simple-zod-form",
            get(routes::simple_zod_form).post(routes::submit_simple_zod_form),
        )
        .route(routes::SUCCESS_PATH, get(routes::success))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}
