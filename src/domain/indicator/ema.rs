//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with the SMA of the first n closes, then
//! EMA[i] = (C[i] - EMA[i-1]) * k + EMA[i-1].
//! Warmup: first (n-1) positions are undefined.

use crate::domain::error::StockeaseError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_ema(prices: &[f64], window: usize) -> Result<IndicatorSeries, StockeaseError> {
    if window == 0 {
        return Err(StockeaseError::non_positive("window", window));
    }

    let mut values = vec![None; prices.len()];
    if prices.len() < window {
        return Ok(IndicatorSeries {
            indicator_type: IndicatorType::Ema(window),
            values,
        });
    }

    let k = 2.0 / (window as f64 + 1.0);
    let mut ema = prices[..window].iter().sum::<f64>() / window as f64;
    values[window - 1] = Some(ema);

    for (i, &price) in prices.iter().enumerate().skip(window) {
        ema = (price - ema) * k + ema;
        values[i] = Some(ema);
    }

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Ema(window),
        values,
    })
}
