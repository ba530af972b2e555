//! OHLC bar and price series representation.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::error::StockeaseError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Checks the store contract: one symbol, strictly ascending dates, positive
/// prices and non-negative volume.
///
/// `source_name` names the origin (file, table) for the error message.
pub fn validate_bars(bars: &[Bar], source_name: &str) -> Result<(), StockeaseError> {
    let reject = |reason: String| StockeaseError::Ingest {
        source_name: source_name.to_string(),
        reason,
    };

    for (i, bar) in bars.iter().enumerate() {
        if bar.symbol != bars[0].symbol {
            return Err(reject(format!(
                "mixed symbols {} and {}",
                bars[0].symbol, bar.symbol
            )));
        }
        if [bar.open, bar.high, bar.low, bar.close]
            .iter()
            .any(|p| !p.is_finite() || *p <= 0.0)
        {
            return Err(reject(format!("non-positive price on {}", bar.date)));
        }
        if bar.volume < 0 {
            return Err(reject(format!("negative volume on {}", bar.date)));
        }
        if i > 0 {
            let prev = bars[i - 1].date;
            if bar.date == prev {
                return Err(reject(format!("duplicate date {}", bar.date)));
            }
            if bar.date < prev {
                return Err(reject(format!("{} out of order after {}", bar.date, prev)));
            }
        }
    }
    Ok(())
}

/// Chronologically ordered closes for one symbol, index-aligned with `dates`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
}

impl PriceSeries {
    pub fn from_bars(symbol: &str, bars: &[Bar]) -> Self {
        Self {
            symbol: symbol.to_string(),
            dates: bars.iter().map(|b| b.date).collect(),
            closes: bars.iter().map(|b| b.close).collect(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// The last `lookback` closes dated on or before `as_of`.
    pub fn trailing_closes(&self, as_of: NaiveDate, lookback: usize) -> &[f64] {
        let end = self.dates.partition_point(|d| *d <= as_of);
        let start = end.saturating_sub(lookback);
        &self.closes[start..end]
    }
}
