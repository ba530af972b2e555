//! Series store port: per-symbol bar history.

use crate::domain::error::StockeaseError;
use crate::domain::ohlcv::{Bar, PriceSeries};
use chrono::NaiveDate;

/// Supplies the full chronologically ordered bar history for a symbol.
///
/// Implementations validate what they read (see
/// [`validate_bars`](crate::domain::ohlcv::validate_bars)) so the engine only
/// ever sees ascending, de-duplicated bars. An unknown symbol yields an empty
/// vector, not an error.
pub trait DataPort {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, StockeaseError>;

    fn list_symbols(&self) -> Result<Vec<String>, StockeaseError>;

    /// Close series for `symbol`; [`StockeaseError::NoData`] when it has no bars.
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, StockeaseError> {
        let bars = self.fetch_bars(symbol)?;
        if bars.is_empty() {
            return Err(StockeaseError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(PriceSeries::from_bars(symbol, &bars))
    }

    /// First date, last date and bar count, or `None` when the symbol has no bars.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StockeaseError> {
        let bars = self.fetch_bars(symbol)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
