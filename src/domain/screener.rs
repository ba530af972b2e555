//! Latest-bar snapshot per symbol, with trailing volatility.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::error::StockeaseError;
use crate::domain::ohlcv::{Bar, PriceSeries};
use crate::domain::volatility::{volatility_as_of, VolatilityEstimate};
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSnapshot {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: f64,
    pub previous_close: Option<f64>,
    pub volume: i64,
    pub volatility: VolatilityEstimate,
}

impl StockSnapshot {
    /// Close-to-close change in percent, when a previous close exists.
    pub fn change_pct(&self) -> Option<f64> {
        self.previous_close
            .map(|prev| (self.close - prev) / prev * 100.0)
    }
}

/// Snapshot of the last bar in `bars`; `None` when there are no bars.
pub fn snapshot(symbol: &str, bars: &[Bar], lookback: usize) -> Option<StockSnapshot> {
    let latest = bars.last()?;
    let series = PriceSeries::from_bars(symbol, bars);
    let previous_close = bars.len().checked_sub(2).map(|i| bars[i].close);

    Some(StockSnapshot {
        symbol: symbol.to_string(),
        date: latest.date,
        close: latest.close,
        previous_close,
        volume: latest.volume,
        volatility: volatility_as_of(&series, latest.date, lookback),
    })
}

/// Fetches and snapshots one symbol; `Ok(None)` when it has no bars.
pub fn screen_symbol(
    data_port: &dyn DataPort,
    symbol: &str,
    lookback: usize,
) -> Result<Option<StockSnapshot>, StockeaseError> {
    let bars = data_port.fetch_bars(symbol)?;
    Ok(snapshot(symbol, &bars, lookback))
}

/// Snapshots every symbol the store lists, sequentially.
///
/// A symbol whose fetch fails is logged and skipped; the listing itself failing
/// is an error.
pub fn screen(data_port: &dyn DataPort, lookback: usize) -> Result<Vec<StockSnapshot>, StockeaseError> {
    let symbols = data_port.list_symbols()?;
    let mut snapshots = Vec::with_capacity(symbols.len());

    for symbol in &symbols {
        match screen_symbol(data_port, symbol, lookback) {
            Ok(Some(s)) => snapshots.push(s),
            Ok(None) => debug!(symbol = %symbol, "no bars, skipping"),
            Err(e) => warn!(symbol = %symbol, error = %e, "skipping symbol"),
        }
    }

    debug!(listed = symbols.len(), screened = snapshots.len(), "screen complete");
    Ok(snapshots)
}
