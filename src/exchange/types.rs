// exchange/types.rs - Raw Upbit API response shapes
//
// Fields that the gateway validates or may drop on are Options here; the
// conversion helpers in utils.rs turn these into the domain model.

use serde::Deserialize;

/// One bar of `/v1/candles/days` or `/v1/candles/minutes/60`. Upbit returns
/// windows newest-first.
#[derive(Debug, Clone, Deserialize)]
pub struct UpbitCandle {
    pub market: String,

    /// Bar close time in milliseconds.
    pub timestamp: i64,

    pub opening_price: Option<f64>,
    pub high_price: Option<f64>,
    pub low_price: Option<f64>,

    /// Closing price of the bar.
    pub trade_price: Option<f64>,

    /// Accumulated trade value of the bar.
    pub candle_acc_trade_price: Option<f64>,

    /// Accumulated trade volume of the bar.
    pub candle_acc_trade_volume: Option<f64>,
}

/// One entry of `/v1/ticker`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpbitTicker {
    pub market: String,
    pub trade_price: f64,
}

/// One entry of `/v1/accounts`. Upbit reports amounts as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct UpbitBalance {
    pub currency: String,
    pub balance: String,
    pub locked: String,
    pub avg_buy_price: String,
}

/// `/v1/orderbook` response for one market. Everything is optional so the
/// gateway can report precisely which required field is missing.
#[derive(Debug, Clone, Deserialize)]
pub struct UpbitOrderbook {
    pub timestamp: Option<i64>,
    pub total_ask_size: Option<f64>,
    pub total_bid_size: Option<f64>,
    pub orderbook_units: Option<Vec<UpbitOrderbookUnit>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpbitOrderbookUnit {
    pub ask_price: Option<f64>,
    pub bid_price: Option<f64>,
    pub ask_size: Option<f64>,
    pub bid_size: Option<f64>,
}

/// Acknowledgement returned by `/v1/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderReceipt {
    pub uuid: String,
    pub side: String,
    pub ord_type: String,
    pub market: String,
    pub state: Option<String>,
    pub created_at: Option<String>,
}
