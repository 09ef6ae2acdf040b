// indicators/mod.rs - Technical indicator calculation
//
// Pure functions over chronological candle windows. No I/O, no failure
// modes beyond insufficient history, which shows up as leading `None`s.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger_bands, BollingerOutput};
pub use ema::ema;
pub use macd::{macd, MacdOutput};
pub use rsi::rsi;
pub use sma::sma;

use crate::models::{AnalyzedCandle, Candle, IndicatorSet};

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_DEV: f64 = 2.0;
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const SMA_PERIOD: usize = 20;
pub const EMA_PERIOD: usize = 12;

/// Attach the standard indicator set to every candle of a window. Output
/// keeps the input order and length; positions without enough history get
/// null indicator fields.
pub fn analyze(candles: &[Candle]) -> Vec<AnalyzedCandle> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let bands = bollinger_bands(&closes, BOLLINGER_PERIOD, BOLLINGER_STD_DEV);
    let rsi_values = rsi(&closes, RSI_PERIOD);
    let macd_values = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let sma_values = sma(&closes, SMA_PERIOD);
    let ema_values = ema(&closes, EMA_PERIOD);

    candles
        .iter()
        .enumerate()
        .map(|(i, candle)| AnalyzedCandle {
            candle: candle.clone(),
            indicators: IndicatorSet {
                bb_upper: bands.upper[i],
                bb_mid: bands.middle[i],
                bb_lower: bands.lower[i],
                rsi: rsi_values[i],
                macd: macd_values.macd[i],
                macd_signal: macd_values.signal[i],
                macd_diff: macd_values.histogram[i],
                sma_20: sma_values[i],
                ema_12: ema_values[i],
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn candles(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 86_400, 0).unwrap(),
                open: close - 1.0,
                high: close + 2.0,
                low: close - 2.0,
                close,
                volume: 10.0,
                value: close * 10.0,
            })
            .collect()
    }

    #[test]
    fn test_last_bar_fully_populated_with_26_bars() {
        let closes: Vec<f64> = (0..26).map(|i| 100.0 + (i % 5) as f64).collect();
        let analyzed = analyze(&candles(&closes));
        let last = &analyzed.last().unwrap().indicators;

        assert!(last.rsi.is_some());
        assert!(last.macd.is_some());
        assert!(last.sma_20.is_some());
        assert!(last.ema_12.is_some());
        assert!(last.bb_upper.is_some());
        assert!(last.bb_mid.is_some());
        assert!(last.bb_lower.is_some());
    }

    #[test]
    fn test_signal_line_needs_longer_history() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let analyzed = analyze(&candles(&closes));
        assert!(analyzed.last().unwrap().indicators.macd_signal.is_none());

        let closes: Vec<f64> = (0..34).map(|i| 100.0 + i as f64).collect();
        let analyzed = analyze(&candles(&closes));
        assert!(analyzed.last().unwrap().indicators.macd_signal.is_some());
        assert!(analyzed.last().unwrap().indicators.macd_diff.is_some());
    }

    #[test]
    fn test_analyze_preserves_order_and_length() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let input = candles(&closes);
        let analyzed = analyze(&input);

        assert_eq!(analyzed.len(), input.len());
        for (out, src) in analyzed.iter().zip(&input) {
            assert_eq!(out.candle.timestamp, src.timestamp);
            assert_eq!(out.candle.close, src.close);
        }
    }

    #[test]
    fn test_short_window_is_all_null() {
        let analyzed = analyze(&candles(&[100.0, 101.0, 102.0]));
        for row in &analyzed {
            assert!(row.indicators.sma_20.is_none());
            assert!(row.indicators.rsi.is_none());
            assert!(row.indicators.macd.is_none());
        }
    }
}
