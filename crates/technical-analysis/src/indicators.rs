use analysis_core::Bar;
use serde::{Deserialize, Serialize};

pub const SMA_SHORT: usize = 20;
pub const SMA_MEDIUM: usize = 50;
pub const SMA_LONG: usize = 200;
pub const RSI_PERIOD: usize = 14;
/// Lookback for short-term momentum and each half of the volume comparison
pub const MOMENTUM_BARS: usize = 5;

/// Closing prices in bar order
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Simple Moving Average of the most recent `period` values.
///
/// `None` when there are fewer than `period` values.
pub fn sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }

    let window = &data[data.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Relative Strength Index over the most recent `period` transitions.
///
/// Plain averages of gains and losses (not Wilder smoothing). Needs
/// `period + 1` values. All-gain windows read 100.
pub fn rsi(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period + 1 {
        return None;
    }

    let window = &data[data.len() - (period + 1)..];
    let (gains, losses) = window.windows(2).fold((0.0, 0.0), |(g, l), w| {
        let change = w[1] - w[0];
        if change > 0.0 {
            (g + change, l)
        } else {
            (g, l + change.abs())
        }
    });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}

/// `(current - previous) / previous * 100`.
///
/// A zero baseline yields exactly 0 rather than NaN or infinity. That keeps
/// downstream math finite, but reads as "flat" for what is really a
/// degenerate input.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// Percent change of the last value against the value `lookback` steps earlier
pub fn momentum(data: &[f64], lookback: usize) -> Option<f64> {
    if lookback == 0 || data.len() < lookback + 1 {
        return None;
    }
    let last = data[data.len() - 1];
    let base = data[data.len() - 1 - lookback];
    Some(percent_change(last, base))
}

/// Mean volume of the last `window` bars over the mean of the `window` before.
///
/// `None` without `2 * window` bars or when the earlier window traded nothing.
pub fn volume_ratio(bars: &[Bar], window: usize) -> Option<f64> {
    if window == 0 || bars.len() < window * 2 {
        return None;
    }

    let recent = &bars[bars.len() - window..];
    let prior = &bars[bars.len() - window * 2..bars.len() - window];

    let recent_avg = recent.iter().map(|b| b.volume).sum::<f64>() / window as f64;
    let prior_avg = prior.iter().map(|b| b.volume).sum::<f64>() / window as f64;

    if prior_avg <= 0.0 {
        return None;
    }
    Some(recent_avg / prior_avg)
}

/// Highest high across the bars
pub fn highest_high(bars: &[Bar]) -> Option<f64> {
    bars.iter().map(|b| b.high).reduce(f64::max)
}

/// Lowest low across the bars
pub fn lowest_low(bars: &[Bar]) -> Option<f64> {
    bars.iter().map(|b| b.low).reduce(f64::min)
}

/// Every indicator the scorers consume, derived from one bar history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub rsi: Option<f64>,
    pub momentum_5: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub high_52w: Option<f64>,
    pub low_52w: Option<f64>,
}

impl IndicatorSet {
    /// Compute everything from one chronologically ordered bar slice.
    pub fn from_bars(bars: &[Bar]) -> Self {
        let closes = closes(bars);

        Self {
            sma_20: sma(&closes, SMA_SHORT),
            sma_50: sma(&closes, SMA_MEDIUM),
            sma_200: sma(&closes, SMA_LONG),
            rsi: rsi(&closes, RSI_PERIOD),
            momentum_5: momentum(&closes, MOMENTUM_BARS),
            volume_ratio: volume_ratio(bars, MOMENTUM_BARS),
            high_52w: highest_high(bars),
            low_52w: lowest_low(bars),
        }
    }
}
