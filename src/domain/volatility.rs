//! Realized volatility from log returns.
//!
//! sigma = sample stddev (n-1) of ln(C[i]/C[i-1]), annualized by sqrt(252),
//! reported as a percentage.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::ohlcv::PriceSeries;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const DEFAULT_LOOKBACK_DAYS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VolatilityEstimate {
    /// Annualized volatility in percent.
    Annualized { percent: f64 },
    /// Too few usable observations; distinct from zero volatility.
    InsufficientData { observations: usize },
}

impl VolatilityEstimate {
    pub fn percent(&self) -> Option<f64> {
        match self {
            VolatilityEstimate::Annualized { percent } => Some(*percent),
            VolatilityEstimate::InsufficientData { .. } => None,
        }
    }
}

/// Estimates annualized volatility over a chronological window of closes.
///
/// Pairs whose earlier close is not positive are skipped. The sample standard
/// deviation needs at least two returns, so fewer than three usable closes is
/// not computable. A window with exactly one return is therefore
/// `InsufficientData` rather than a NaN from the `n - 1 == 0` divisor.
pub fn realized_volatility(closes: &[f64]) -> VolatilityEstimate {
    if closes.len() < 2 {
        return VolatilityEstimate::InsufficientData {
            observations: closes.len(),
        };
    }

    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| (w[1] / w[0]).ln())
        .collect();

    if returns.len() < 2 {
        return VolatilityEstimate::InsufficientData {
            observations: closes.len(),
        };
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);

    VolatilityEstimate::Annualized {
        percent: variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt() * 100.0,
    }
}

/// Volatility over the `lookback` closes dated on or before `as_of`.
pub fn volatility_as_of(series: &PriceSeries, as_of: NaiveDate, lookback: usize) -> VolatilityEstimate {
    realized_volatility(series.trailing_closes(as_of, lookback))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityReport {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub lookback: usize,
    pub volatility: VolatilityEstimate,
}

impl VolatilityReport {
    /// Defaults `as_of` to the last bar; `None` when the series is empty.
    pub fn for_series(series: &PriceSeries, as_of: Option<NaiveDate>, lookback: usize) -> Option<Self> {
        let as_of = as_of.or_else(|| series.last_date())?;
        Some(Self {
            symbol: series.symbol().to_string(),
            as_of,
            lookback,
            volatility: volatility_as_of(series, as_of, lookback),
        })
    }
}
