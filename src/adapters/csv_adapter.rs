//! CSV file data adapter.
//!
//! One `<SYMBOL>.csv` per symbol. Column headers are matched case-insensitively
//! (`date, open, high, low, close, volume`); any other column is ignored.

use crate::domain::error::StockeaseError;
use crate::domain::ohlcv::{validate_bars, Bar};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Path of the symbol's file. The symbol must be a single plain file name
    /// so it cannot resolve outside `base_path`.
    fn csv_path(&self, symbol: &str) -> Result<PathBuf, StockeaseError> {
        let mut components = Path::new(symbol).components();
        let plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain || symbol.contains(['/', '\\']) {
            return Err(StockeaseError::InvalidParameter {
                name: "symbol".to_string(),
                value: symbol.to_string(),
                reason: "must be a plain symbol name".to_string(),
            });
        }
        Ok(self.base_path.join(format!("{}.csv", symbol)))
    }
}

/// Reads, sorts and validates every bar in `path` under `symbol`.
pub fn read_bars(path: &Path, symbol: &str) -> Result<Vec<Bar>, StockeaseError> {
    let source = path.display().to_string();
    let reject = |reason: String| StockeaseError::Ingest {
        source_name: source.clone(),
        reason,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| reject(e.to_string()))?;

    let headers = rdr.headers().map_err(|e| reject(e.to_string()))?.clone();
    let mut index = [0usize; 6];
    for (slot, column) in index.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(column))
            .ok_or_else(|| reject(format!("missing {} column", column)))?;
    }

    let mut bars = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| reject(format!("CSV parse error: {}", e)))?;
        let field = |i: usize| record.get(index[i]).unwrap_or("");
        let row = line + 2;

        let date = NaiveDate::parse_from_str(field(0), "%Y-%m-%d")
            .map_err(|e| reject(format!("row {}: invalid date {:?}: {}", row, field(0), e)))?;

        let mut prices = [0.0f64; 4];
        for (k, price) in prices.iter_mut().enumerate() {
            let raw = field(k + 1);
            *price = parse_number(raw)
                .ok_or_else(|| reject(format!("row {}: invalid {} value {:?}", row, COLUMNS[k + 1], raw)))?;
        }

        let raw_volume = field(5);
        let volume = parse_number(raw_volume)
            .filter(|v| v.fract() == 0.0)
            .map(|v| v as i64)
            .ok_or_else(|| reject(format!("row {}: invalid volume value {:?}", row, raw_volume)))?;

        let [open, high, low, close] = prices;
        bars.push(Bar {
            symbol: symbol.to_string(),
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    bars.sort_by_key(|b| b.date);
    validate_bars(&bars, &source)?;
    debug!(path = %source, symbol, bars = bars.len(), "loaded csv");
    Ok(bars)
}

/// Accepts thousands separators, e.g. `1,234.5`.
fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok().filter(|v| v.is_finite())
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, StockeaseError> {
        let path = self.csv_path(symbol)?;
        if !path.is_file() {
            return Ok(Vec::new());
        }
        read_bars(&path, symbol)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockeaseError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StockeaseError::Database {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| StockeaseError::Database {
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if let (true, Some(stem)) = (is_csv, path.file_stem()) {
                symbols.push(stem.to_string_lossy().into_owned());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
