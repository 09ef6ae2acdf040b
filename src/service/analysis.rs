// service/analysis.rs - Analysis aggregation

use std::sync::Arc;
use tracing::debug;

use crate::exchange::{Exchange, ExchangeError};
use crate::indicators;
use crate::models::AnalysisPayload;

pub const DAILY_CANDLE_COUNT: u32 = 30;
pub const HOURLY_CANDLE_COUNT: u32 = 24;

/// Composes the exchange's read operations into the payload the decision
/// agent works from. Any sub-call failure propagates; the agent needs the
/// complete picture, so there is no partial-result mode.
pub struct AnalysisService {
    exchange: Arc<dyn Exchange>,
}

impl AnalysisService {
    pub fn new(exchange: Arc<dyn Exchange>) -> Self {
        Self { exchange }
    }

    pub async fn prepare_analysis_data(&self) -> Result<AnalysisPayload, ExchangeError> {
        let investment_status = self.exchange.investment_status().await?;
        let daily = self.exchange.daily_candles(DAILY_CANDLE_COUNT).await?;
        let hourly = self.exchange.hourly_candles(HOURLY_CANDLE_COUNT).await?;
        let orderbook_status = self.exchange.orderbook().await?;

        debug!(
            "analysis data ready: {} daily bars, {} hourly bars, {} book levels",
            daily.len(),
            hourly.len(),
            orderbook_status.orderbook_units.len()
        );

        Ok(AnalysisPayload {
            investment_status,
            candle_data: indicators::analyze(&daily),
            hour_candle_data: indicators::analyze(&hourly),
            orderbook_status,
        })
    }
}
