//! SQLite series store.

use std::path::Path;

use crate::domain::error::StockeaseError;
use crate::domain::ohlcv::{validate_bars, Bar};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn pool_error(e: r2d2::Error) -> StockeaseError {
    StockeaseError::Database {
        reason: e.to_string(),
    }
}

fn query_error(e: rusqlite::Error) -> StockeaseError {
    StockeaseError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(raw.len(), rusqlite::types::Type::Text, Box::new(e))
    })
}

impl SqliteAdapter {
    /// Opens (creating if needed) the database file and ensures the schema exists.
    pub fn open(path: &Path, pool_size: u32) -> Result<Self, StockeaseError> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_error)?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        debug!(path = %path.display(), pool_size, "sqlite store opened");
        Ok(adapter)
    }

    pub fn in_memory() -> Result<Self, StockeaseError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_error)?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, StockeaseError> {
        self.pool.get().map_err(pool_error)
    }

    pub fn initialize_schema(&self) -> Result<(), StockeaseError> {
        self.conn()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS bars (
                    symbol TEXT NOT NULL,
                    date TEXT NOT NULL,
                    open REAL NOT NULL,
                    high REAL NOT NULL,
                    low REAL NOT NULL,
                    close REAL NOT NULL,
                    volume INTEGER NOT NULL,
                    PRIMARY KEY (symbol, date)
                );
                CREATE INDEX IF NOT EXISTS idx_bars_date ON bars(date);",
            )
            .map_err(query_error)
    }

    /// Upserts one symbol's bars in a single transaction.
    ///
    /// The batch is validated first; a bar whose `(symbol, date)` already
    /// exists replaces the stored row. Returns the number of rows written.
    pub fn insert_bars(&self, bars: &[Bar]) -> Result<usize, StockeaseError> {
        validate_bars(bars, "sqlite import")?;

        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_error)?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT OR REPLACE INTO bars (symbol, date, open, high, low, close, volume)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )
                .map_err(query_error)?;

            for bar in bars {
                stmt.execute(params![
                    bar.symbol,
                    bar.date.format(DATE_FORMAT).to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume
                ])
                .map_err(query_error)?;
            }
        }
        tx.commit().map_err(query_error)?;

        if let Some(first) = bars.first() {
            info!(symbol = %first.symbol, rows = bars.len(), "bars stored");
        }
        Ok(bars.len())
    }
}

impl DataPort for SqliteAdapter {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, StockeaseError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT symbol, date, open, high, low, close, volume
                 FROM bars
                 WHERE symbol = ?1
                 ORDER BY date ASC",
            )
            .map_err(query_error)?;

        let rows = stmt
            .query_map(params![symbol], |row| {
                let date_str: String = row.get(1)?;
                Ok(Bar {
                    symbol: row.get(0)?,
                    date: parse_date(&date_str)?,
                    open: row.get(2)?,
                    high: row.get(3)?,
                    low: row.get(4)?,
                    close: row.get(5)?,
                    volume: row.get(6)?,
                })
            })
            .map_err(query_error)?;

        let bars = rows.collect::<Result<Vec<_>, _>>().map_err(query_error)?;
        validate_bars(&bars, &format!("sqlite bars for {}", symbol))?;
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockeaseError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT symbol FROM bars ORDER BY symbol")
            .map_err(query_error)?;

        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(query_error)?;

        rows.collect::<Result<Vec<String>, _>>().map_err(query_error)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StockeaseError> {
        let conn = self.conn()?;

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(
                "SELECT MIN(date), MAX(date), COUNT(*) FROM bars WHERE symbol = ?1",
                params![symbol],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(query_error)?;

        match result {
            (Some(min_str), Some(max_str), count) if count > 0 => {
                let min = parse_date(&min_str).map_err(query_error)?;
                let max = parse_date(&max_str).map_err(query_error)?;
                Ok(Some((min, max, count as usize)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(symbol: &str, date: (i32, u32, u32), close: f64) -> Bar {
        Bar {
            symbol: symbol.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn open_creates_file_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("prices.db");
        let adapter = SqliteAdapter::open(&path, 2).unwrap();
        adapter.insert_bars(&[bar("NABIL", (2024, 1, 1), 500.0)]).unwrap();

        let reopened = SqliteAdapter::open(&path, 2).unwrap();
        assert_eq!(reopened.fetch_bars("NABIL").unwrap().len(), 1);
    }

    #[test]
    fn fetch_bars_returns_ascending() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter
            .insert_bars(&[bar("NABIL", (2024, 1, 1), 100.5), bar("NABIL", (2024, 1, 2), 101.5)])
            .unwrap();

        let fetched = adapter.fetch_bars("NABIL").unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].symbol, "NABIL");
        assert_eq!(fetched[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(fetched[1].close, 101.5);
    }

    #[test]
    fn fetch_unknown_symbol_is_empty() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        assert!(adapter.fetch_bars("NONE").unwrap().is_empty());
    }

    #[test]
    fn reinsert_replaces_existing_date() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.insert_bars(&[bar("NICA", (2024, 1, 1), 10.0)]).unwrap();
        adapter.insert_bars(&[bar("NICA", (2024, 1, 1), 12.0)]).unwrap();

        let fetched = adapter.fetch_bars("NICA").unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].close, 12.0);
    }

    #[test]
    fn fetch_rejects_rows_written_outside_insert() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.insert_bars(&[bar("NICA", (2024, 1, 1), 10.0)]).unwrap();
        adapter
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO bars (symbol, date, open, high, low, close, volume)
                 VALUES ('NICA', '2024-01-02', 1.0, 1.0, 1.0, -3.0, 10)",
                [],
            )
            .unwrap();

        let err = adapter.fetch_bars("NICA").unwrap_err();
        assert!(matches!(err, StockeaseError::Ingest { .. }));
        assert!(err.to_string().contains("sqlite bars for NICA"));
    }

    #[test]
    fn insert_rejects_invalid_batch() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        let err = adapter
            .insert_bars(&[bar("NICA", (2024, 1, 2), 10.0), bar("NICA", (2024, 1, 1), 11.0)])
            .unwrap_err();
        assert!(matches!(err, StockeaseError::Ingest { .. }));
        assert!(adapter.fetch_bars("NICA").unwrap().is_empty());
    }

    #[test]
    fn list_symbols_sorted_distinct() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter
            .insert_bars(&[bar("NICA", (2024, 1, 1), 150.5), bar("NICA", (2024, 1, 2), 151.0)])
            .unwrap();
        adapter.insert_bars(&[bar("ADBL", (2024, 1, 1), 300.0)]).unwrap();

        assert_eq!(adapter.list_symbols().unwrap(), vec!["ADBL", "NICA"]);
    }

    #[test]
    fn data_range() {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter
            .insert_bars(&[bar("NABIL", (2024, 1, 1), 100.5), bar("NABIL", (2024, 1, 5), 102.5)])
            .unwrap();

        let (min, max, count) = adapter.get_data_range("NABIL").unwrap().unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(count, 2);
        assert!(adapter.get_data_range("ADBL").unwrap().is_none());
    }
}
