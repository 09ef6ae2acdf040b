// Bollinger Bands

use super::sma::sma;

pub struct BollingerOutput {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Bands at `num_std` population standard deviations around the
/// `period`-bar simple moving average.
pub fn bollinger_bands(values: &[f64], period: usize, num_std: f64) -> BollingerOutput {
    let n = values.len();
    let middle = sma(values, period);
    let mut upper = vec![None; n];
    let mut lower = vec![None; n];

    for i in 0..n {
        if let Some(mean) = middle[i] {
            let window = &values[i + 1 - period..=i];
            let variance =
                window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / period as f64;
            let deviation = num_std * variance.sqrt();
            upper[i] = Some(mean + deviation);
            lower[i] = Some(mean - deviation);
        }
    }

    BollingerOutput {
        upper,
        middle,
        lower,
    }
}
