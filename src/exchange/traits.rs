// exchange/traits.rs - Exchange abstraction

use async_trait::async_trait;

use super::errors::ExchangeError;
use super::types::OrderReceipt;
use crate::models::{Candle, InvestmentStatus, OrderBookSnapshot};

/// Everything the trading pipeline needs from an exchange. The service
/// layer holds an `Arc<dyn Exchange>` so tests can substitute a mock.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Most recent `count` daily bars, chronological. Empty when the
    /// upstream has no data for the market.
    async fn daily_candles(&self, count: u32) -> Result<Vec<Candle>, ExchangeError>;

    /// Most recent `count` hourly bars, chronological.
    async fn hourly_candles(&self, count: u32) -> Result<Vec<Candle>, ExchangeError>;

    /// Current price plus account balances for the traded market.
    async fn investment_status(&self) -> Result<InvestmentStatus, ExchangeError>;

    /// Validated snapshot of the current order book.
    async fn orderbook(&self) -> Result<OrderBookSnapshot, ExchangeError>;

    /// Available (non-locked) balance of one currency, 0 if absent.
    async fn available_balance(&self, currency: &str) -> Result<f64, ExchangeError>;

    /// Market buy spending `notional` units of the quote currency.
    async fn buy_market_order(&self, notional: f64) -> Result<OrderReceipt, ExchangeError>;

    /// Market sell of `volume` units of the base currency.
    async fn sell_market_order(&self, volume: f64) -> Result<OrderReceipt, ExchangeError>;
}
