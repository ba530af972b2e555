//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]). Warmup: first (n-1) positions are undefined.

use crate::domain::error::StockeaseError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_sma(prices: &[f64], window: usize) -> Result<IndicatorSeries, StockeaseError> {
    if window == 0 {
        return Err(StockeaseError::non_positive("window", window));
    }

    let values = (0..prices.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                let slice = &prices[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect();

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Sma(window),
        values,
    })
}
