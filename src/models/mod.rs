use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Single OHLCV bar. Windows are chronological once they leave the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Accumulated trade value (price * volume) of the bar.
    pub value: f64,
}

/// Indicator fields derived for one candle. `None` means the position does
/// not have enough history yet and serializes as JSON null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub bb_upper: Option<f64>,
    pub bb_mid: Option<f64>,
    pub bb_lower: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_diff: Option<f64>,
    pub sma_20: Option<f64>,
    pub ema_12: Option<f64>,
}

/// Candle with its derived indicator fields, flattened into one JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedCandle {
    #[serde(flatten)]
    pub candle: Candle,
    #[serde(flatten)]
    pub indicators: IndicatorSet,
}

/// One price level of the order book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub ask_price: f64,
    pub bid_price: f64,
    pub ask_size: f64,
    pub bid_size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// Snapshot time in milliseconds, as reported by the exchange.
    pub timestamp: i64,
    pub total_ask_size: f64,
    pub total_bid_size: f64,
    /// total_ask_size / total_bid_size, 0 when there is no bid volume.
    pub ask_bid_ratio: f64,
    /// Levels ordered best-price-first, as delivered by the exchange.
    pub orderbook_units: Vec<OrderBookLevel>,
}

/// Balance of a single currency on the exchange account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub amount: f64,
    pub avg_buy_price: f64,
    pub locked: f64,
}

/// Account snapshot for the traded market: balances of the base and quote
/// currencies plus the derived profit/loss figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentStatus {
    pub balance: BTreeMap<String, BalanceEntry>,
    pub current_price: f64,
    pub invested_amount: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    pub profit_loss_percent: f64,
}

/// Everything the decision agent gets to see, serialized as one JSON blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPayload {
    pub investment_status: InvestmentStatus,
    pub candle_data: Vec<AnalyzedCandle>,
    pub hour_candle_data: Vec<AnalyzedCandle>,
    pub orderbook_status: OrderBookSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "buy"),
            TradeAction::Sell => write!(f, "sell"),
            TradeAction::Hold => write!(f, "hold"),
        }
    }
}

/// The agent's verdict for one trading cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub decision: TradeAction,
    pub reason: String,
}
