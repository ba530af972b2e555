//! Technical indicator implementations.
//!
//! Every indicator is a pure function from a close-price slice to an
//! [`IndicatorSeries`] of the same length. Positions inside the indicator's
//! lookback hold `None` rather than zero.
//!
//! - `IndicatorType`: indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: the aligned output sequence
//! - [`compute_indicators`]: computes a set of indicators once each

pub mod ema;
pub mod rsi;
pub mod sma;

use std::collections::HashMap;
use std::fmt;

use crate::domain::error::StockeaseError;

pub use ema::calculate_ema;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
}

impl IndicatorType {
    /// Column key used in result tables, e.g. `MA50`, `EMA9`, `RSI14`.
    pub fn column_name(&self) -> String {
        match self {
            IndicatorType::Sma(window) => format!("MA{}", window),
            IndicatorType::Ema(window) => format!("EMA{}", window),
            IndicatorType::Rsi(period) => format!("RSI{}", period),
        }
    }

    pub fn compute(&self, prices: &[f64]) -> Result<IndicatorSeries, StockeaseError> {
        match *self {
            IndicatorType::Sma(window) => calculate_sma(prices, window),
            IndicatorType::Ema(window) => calculate_ema(prices, window),
            IndicatorType::Rsi(period) => calculate_rsi(prices, period),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(window) => write!(f, "SMA({})", window),
            IndicatorType::Ema(window) => write!(f, "EMA({})", window),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn is_defined(&self, index: usize) -> bool {
        self.get(index).is_some()
    }
}

/// Computes each distinct indicator in `types` exactly once over `prices`.
pub fn compute_indicators(
    prices: &[f64],
    types: &[IndicatorType],
) -> Result<HashMap<IndicatorType, IndicatorSeries>, StockeaseError> {
    let mut computed = HashMap::with_capacity(types.len());
    for indicator_type in types {
        if computed.contains_key(indicator_type) {
            continue;
        }
        computed.insert(*indicator_type, indicator_type.compute(prices)?);
    }
    Ok(computed)
}
