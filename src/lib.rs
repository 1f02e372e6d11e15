//! xai-proxy: forwarding proxy for the xAI API.
//!
//! Everything under `/v1/` is relayed to the configured upstream. Image
//! generation bodies are reduced to the parameters the upstream accepts, and
//! CORS preflights are answered locally.

use std::sync::Arc;

use axum::routing::any;
use axum::Router;

pub mod cli;
pub mod config;
pub mod errors;
pub mod proxy;

/// Shared application state passed to handlers.
pub struct AppState {
    pub config: config::Config,
    pub upstream_client: proxy::upstream::UpstreamClient,
}

impl AppState {
    pub fn new(config: config::Config) -> anyhow::Result<Self> {
        let upstream_client = proxy::upstream::UpstreamClient::new(&config)?;
        Ok(Self {
            config,
            upstream_client,
        })
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Proxy: catch everything
        .fallback(any(proxy::handler::proxy_handler))
        .with_state(state)
        .layer(axum::middleware::from_fn(proxy::cors::preflight_middleware))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
