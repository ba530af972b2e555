//! JSON HTTP API over the engine.

mod error;
mod handlers;

pub use error::{status_from_error, WebError};

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::domain::engine_config::EngineConfig;
use crate::domain::error::StockeaseError;
use crate::ports::data_port::DataPort;

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    pub engine: EngineConfig,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/symbols", get(handlers::symbols))
        .route("/strategy/{symbol}", get(handlers::golden_cross))
        .route("/ma_crossover/{symbol}", get(handlers::ma_crossover))
        .route("/volatility/{symbol}", get(handlers::volatility))
        .route("/stocks", get(handlers::stocks))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Binds `state.engine.listen` and serves until the process is stopped.
pub async fn serve(state: AppState) -> Result<(), StockeaseError> {
    let addr = state.engine.listen.clone();
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    info!(addr = %addr, "listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
