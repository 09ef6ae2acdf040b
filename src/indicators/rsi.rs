// Relative Strength Index (Wilder smoothing)

/// RSI over `period` price changes. The first value appears at index
/// `period` since one extra price is needed to form the first change.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let change = values[i] - values[i - 1];
        if change >= 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }
    let mut avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in (period + 1)..values.len() {
        let change = values[i] - values[i - 1];
        let (gain, loss) = if change >= 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // Flat series carries no momentum signal either way.
        if avg_gain == 0.0 {
            return 50.0;
        }
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_first_value_index() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&values, 14);

        assert!(out[13].is_none());
        assert!(out[14].is_some());
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&values, 14);
        assert_eq!(out[29], Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses_is_0() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let out = rsi(&values, 14);
        assert_eq!(out[29], Some(0.0));
    }

    #[test]
    fn test_rsi_flat_series_is_neutral() {
        let values = [42.0; 20];
        let out = rsi(&values, 14);
        assert_eq!(out[19], Some(50.0));
    }

    #[test]
    fn test_rsi_bounded() {
        let values: Vec<f64> = (0..40)
            .map(|i| 100.0 + ((i * 7) % 13) as f64 - 6.0)
            .collect();
        for value in rsi(&values, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }
}
