use axum::{extract::State, response::Json};
use serde::Serialize;
use tracing::info;

use super::error::ApiError;
use super::routes::AppState;
use crate::models::Decision;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T> {
    pub status_code: u16,
    pub item: T,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK" })
}

/// One full trading cycle: aggregate market data, ask the agent, act on
/// the decision. Any failure comes back as the error envelope.
pub async fn run_trading_cycle(
    State(state): State<AppState>,
) -> Result<Json<BaseResponse<Decision>>, ApiError> {
    let payload = state.analysis.prepare_analysis_data().await?;
    let source = serde_json::to_string_pretty(&payload)?;

    let decision = state.agent.invoke(&source).await?;
    info!("decision: {} ({})", decision.decision, decision.reason);

    state.executor.execute(&decision).await?;

    Ok(Json(BaseResponse {
        status_code: 200,
        item: decision,
    }))
}
