// Library root - the router is built here so tests can drive it directly

pub mod config;
pub mod handlers;

pub use config::Config;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.gas_timeout)
            .build()?;
        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .route("/", post(handlers::relay))
        .route("/api/gas", post(handlers::relay))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
