// exchange/utils.rs - Pure conversion and validation helpers

use chrono::DateTime;
use std::collections::BTreeMap;

use super::errors::ExchangeError;
use super::types::{UpbitBalance, UpbitCandle, UpbitOrderbook};
use crate::models::{BalanceEntry, Candle, InvestmentStatus, OrderBookLevel, OrderBookSnapshot};

/// Split a market symbol like `KRW-BTC` into (quote, base) currencies.
pub fn split_market(market: &str) -> Result<(String, String), ExchangeError> {
    match market.split_once('-') {
        Some((quote, base)) if !quote.is_empty() && !base.is_empty() => {
            Ok((quote.to_uppercase(), base.to_uppercase()))
        }
        _ => Err(ExchangeError::InvalidSymbol(format!(
            "expected QUOTE-BASE format, got '{}'",
            market
        ))),
    }
}

/// Convert raw candles to the domain model: rows with any missing OHLCV
/// field are dropped, the rest sorted into chronological order.
pub fn convert_candles(raw: Vec<UpbitCandle>) -> Vec<Candle> {
    let mut candles: Vec<Candle> = raw
        .into_iter()
        .filter_map(|bar| {
            Some(Candle {
                timestamp: DateTime::from_timestamp_millis(bar.timestamp)?,
                open: bar.opening_price?,
                high: bar.high_price?,
                low: bar.low_price?,
                close: bar.trade_price?,
                volume: bar.candle_acc_trade_volume?,
                value: bar.candle_acc_trade_price?,
            })
        })
        .collect();
    candles.sort_by_key(|c| c.timestamp);
    candles
}

/// Validate and convert a raw order book. Missing top-level fields fail;
/// levels missing a sub-field are skipped.
pub fn convert_orderbook(raw: UpbitOrderbook) -> Result<OrderBookSnapshot, ExchangeError> {
    let timestamp = raw
        .timestamp
        .ok_or(ExchangeError::MissingField("timestamp"))?;
    let total_ask_size = raw
        .total_ask_size
        .ok_or(ExchangeError::MissingField("total_ask_size"))?;
    let total_bid_size = raw
        .total_bid_size
        .ok_or(ExchangeError::MissingField("total_bid_size"))?;
    let units = raw
        .orderbook_units
        .ok_or(ExchangeError::MissingField("orderbook_units"))?;

    let orderbook_units: Vec<OrderBookLevel> = units
        .into_iter()
        .filter_map(|unit| {
            Some(OrderBookLevel {
                ask_price: unit.ask_price?,
                bid_price: unit.bid_price?,
                ask_size: unit.ask_size?,
                bid_size: unit.bid_size?,
            })
        })
        .collect();

    let ask_bid_ratio = if total_bid_size > 0.0 {
        total_ask_size / total_bid_size
    } else {
        0.0
    };

    Ok(OrderBookSnapshot {
        timestamp,
        total_ask_size,
        total_bid_size,
        ask_bid_ratio,
        orderbook_units,
    })
}

/// Build the account snapshot: keep only the traded base currency and the
/// quote currency, then derive the profit/loss figures.
pub fn build_investment_status(
    balances: &[UpbitBalance],
    base_currency: &str,
    quote_currency: &str,
    current_price: f64,
) -> Result<InvestmentStatus, ExchangeError> {
    let mut balance = BTreeMap::new();
    for entry in balances {
        if entry.currency == base_currency || entry.currency == quote_currency {
            balance.insert(
                entry.currency.clone(),
                BalanceEntry {
                    amount: parse_amount(&entry.balance, "balance")?,
                    avg_buy_price: parse_amount(&entry.avg_buy_price, "avg_buy_price")?,
                    locked: parse_amount(&entry.locked, "locked")?,
                },
            );
        }
    }

    let mut status = InvestmentStatus {
        balance,
        current_price,
        invested_amount: 0.0,
        current_value: 0.0,
        profit_loss: 0.0,
        profit_loss_percent: 0.0,
    };

    if let Some(coin) = status.balance.get(base_currency) {
        let invested_amount = coin.amount * coin.avg_buy_price;
        let current_value = coin.amount * current_price;
        status.invested_amount = invested_amount;
        status.current_value = current_value;
        status.profit_loss = current_value - invested_amount;
        status.profit_loss_percent = if invested_amount > 0.0 {
            (current_value / invested_amount - 1.0) * 100.0
        } else {
            0.0
        };
    }

    Ok(status)
}

fn parse_amount(raw: &str, field: &'static str) -> Result<f64, ExchangeError> {
    raw.parse::<f64>().map_err(|_| {
        ExchangeError::ParseError(format!("invalid numeric {} value '{}'", field, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::types::UpbitOrderbookUnit;

    fn raw_balance(currency: &str, balance: &str, avg_buy_price: &str) -> UpbitBalance {
        UpbitBalance {
            currency: currency.to_string(),
            balance: balance.to_string(),
            locked: "0.0".to_string(),
            avg_buy_price: avg_buy_price.to_string(),
        }
    }

    #[test]
    fn test_split_market() {
        assert_eq!(
            split_market("KRW-BTC").unwrap(),
            ("KRW".to_string(), "BTC".to_string())
        );
        assert!(split_market("KRWBTC").is_err());
        assert!(split_market("-BTC").is_err());
        assert!(split_market("").is_err());
    }

    #[test]
    fn test_convert_candles_sorts_chronologically() {
        let raw = vec![
            candle_at(2_000, Some(101.0)),
            candle_at(1_000, Some(100.0)),
            candle_at(3_000, Some(102.0)),
        ];
        let candles = convert_candles(raw);

        assert_eq!(candles.len(), 3);
        assert!(candles[0].timestamp < candles[1].timestamp);
        assert!(candles[1].timestamp < candles[2].timestamp);
        assert_eq!(candles[0].close, 100.0);
    }

    #[test]
    fn test_convert_candles_drops_incomplete_rows() {
        let raw = vec![candle_at(1_000, Some(100.0)), candle_at(2_000, None)];
        let candles = convert_candles(raw);
        assert_eq!(candles.len(), 1);
    }

    fn candle_at(timestamp: i64, close: Option<f64>) -> UpbitCandle {
        UpbitCandle {
            market: "KRW-BTC".to_string(),
            timestamp,
            opening_price: Some(99.0),
            high_price: Some(105.0),
            low_price: Some(95.0),
            trade_price: close,
            candle_acc_trade_price: Some(1_000.0),
            candle_acc_trade_volume: Some(10.0),
        }
    }

    fn raw_orderbook() -> UpbitOrderbook {
        UpbitOrderbook {
            timestamp: Some(1_700_000_000_000),
            total_ask_size: Some(3.0),
            total_bid_size: Some(2.0),
            orderbook_units: Some(vec![UpbitOrderbookUnit {
                ask_price: Some(50_000_000.0),
                bid_price: Some(49_990_000.0),
                ask_size: Some(0.1),
                bid_size: Some(0.2),
            }]),
        }
    }

    #[test]
    fn test_ask_bid_ratio() {
        let snapshot = convert_orderbook(raw_orderbook()).unwrap();
        assert!((snapshot.ask_bid_ratio - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_ask_bid_ratio_zero_bid_volume() {
        let mut raw = raw_orderbook();
        raw.total_bid_size = Some(0.0);
        let snapshot = convert_orderbook(raw).unwrap();
        assert_eq!(snapshot.ask_bid_ratio, 0.0);
    }

    #[test]
    fn test_missing_orderbook_units_fails() {
        let mut raw = raw_orderbook();
        raw.orderbook_units = None;
        let err = convert_orderbook(raw).unwrap_err();
        assert!(matches!(err, ExchangeError::MissingField("orderbook_units")));
    }

    #[test]
    fn test_incomplete_level_is_skipped() {
        let mut raw = raw_orderbook();
        raw.orderbook_units
            .as_mut()
            .unwrap()
            .push(UpbitOrderbookUnit {
                ask_price: Some(50_010_000.0),
                bid_price: None,
                ask_size: Some(0.3),
                bid_size: Some(0.1),
            });
        let snapshot = convert_orderbook(raw).unwrap();
        assert_eq!(snapshot.orderbook_units.len(), 1);
    }

    #[test]
    fn test_investment_status_profit_loss() {
        let balances = vec![
            raw_balance("BTC", "0.5", "48000000"),
            raw_balance("KRW", "150000", "0"),
            raw_balance("ETH", "2.0", "3000000"),
        ];
        let status = build_investment_status(&balances, "BTC", "KRW", 50_000_000.0).unwrap();

        // ETH is not part of the traded market.
        assert_eq!(status.balance.len(), 2);
        assert_eq!(status.invested_amount, 24_000_000.0);
        assert_eq!(status.current_value, 25_000_000.0);
        assert_eq!(status.profit_loss, 1_000_000.0);
        assert!((status.profit_loss_percent - 25.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_profit_loss_percent_zero_when_nothing_invested() {
        let balances = vec![
            raw_balance("BTC", "0.5", "0"),
            raw_balance("KRW", "150000", "0"),
        ];
        let status = build_investment_status(&balances, "BTC", "KRW", 50_000_000.0).unwrap();

        assert!(status.current_value > 0.0);
        assert_eq!(status.profit_loss_percent, 0.0);
    }

    #[test]
    fn test_invalid_balance_string_fails() {
        let balances = vec![raw_balance("KRW", "not-a-number", "0")];
        assert!(build_investment_status(&balances, "BTC", "KRW", 1.0).is_err());
    }
}
