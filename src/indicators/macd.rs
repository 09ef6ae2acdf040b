// Moving Average Convergence Divergence

use super::ema::ema;

pub struct MacdOutput {
    /// Fast EMA minus slow EMA.
    pub macd: Vec<Option<f64>>,
    /// EMA of the MACD line.
    pub signal: Vec<Option<f64>>,
    /// MACD line minus signal line.
    pub histogram: Vec<Option<f64>>,
}

/// Standard MACD: `fast`/`slow` EMAs over the input, `signal` EMA over the
/// resulting line. The line needs `slow` values, the signal line
/// `slow + signal - 1`.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdOutput {
    let n = values.len();
    let ema_fast = ema(values, fast);
    let ema_slow = ema(values, slow);

    let mut line = vec![None; n];
    for i in 0..n {
        if let (Some(f), Some(s)) = (ema_fast[i], ema_slow[i]) {
            line[i] = Some(f - s);
        }
    }

    // The signal line is an EMA over the defined suffix of the MACD line.
    let mut signal_line = vec![None; n];
    if let Some(start) = line.iter().position(Option::is_some) {
        let dense: Vec<f64> = line[start..].iter().filter_map(|v| *v).collect();
        for (offset, value) in ema(&dense, signal).into_iter().enumerate() {
            signal_line[start + offset] = value;
        }
    }

    let mut histogram = vec![None; n];
    for i in 0..n {
        if let (Some(m), Some(s)) = (line[i], signal_line[i]) {
            histogram[i] = Some(m - s);
        }
    }

    MacdOutput {
        macd: line,
        signal: signal_line,
        histogram,
    }
}
