//! RSI (Relative Strength Index) indicator.
//!
//! Seed: over the first `period + 1` price changes, average gain and average
//! loss are each the summed magnitude divided by `period`.
//! Subsequent: avg = (prev_avg * (n-1) + current) / n (Wilder's smoothing),
//! where the change at position i is C[i] - C[i-1].
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: the first `period` positions carry the seeded RSI instead of being
//! undefined. Callers that need a strict warmup should ignore positions below
//! `period`.

use crate::domain::error::StockeaseError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_rsi(prices: &[f64], period: usize) -> Result<IndicatorSeries, StockeaseError> {
    if period == 0 {
        return Err(StockeaseError::non_positive("period", period));
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let seed = &deltas[..deltas.len().min(period + 1)];

    let n = period as f64;
    let mut up = seed.iter().filter(|d| **d >= 0.0).sum::<f64>() / n;
    let mut down = -seed.iter().filter(|d| **d < 0.0).sum::<f64>() / n;

    let mut values = Vec::with_capacity(prices.len());
    let seeded = rsi_value(up, down);
    values.extend(std::iter::repeat_n(Some(seeded), prices.len().min(period)));

    for i in period..prices.len() {
        let delta = deltas[i - 1];
        let (gain, loss) = if delta > 0.0 { (delta, 0.0) } else { (0.0, -delta) };

        up = (up * (n - 1.0) + gain) / n;
        down = (down * (n - 1.0) + loss) / n;
        values.push(Some(rsi_value(up, down)));
    }

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    })
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
