use axum::{routing::get, Router};
use std::sync::Arc;

use super::handlers;
use crate::agent::DecisionModel;
use crate::service::{AnalysisService, TradingExecutor};

#[derive(Clone)]
pub struct AppState {
    pub analysis: Arc<AnalysisService>,
    pub agent: Arc<dyn DecisionModel>,
    pub executor: Arc<TradingExecutor>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/v1/test", get(handlers::run_trading_cycle))
        .with_state(state)
}
