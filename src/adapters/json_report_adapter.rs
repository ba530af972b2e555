//! JSON report adapter.
//!
//! Tables render as `{"data": [...], "metadata": {...}}` with one flat object
//! per row keyed by the table header.

use std::io::Write;

use serde_json::{json, Map, Value};

use crate::domain::error::StockeaseError;
use crate::domain::metadata::Metadata;
use crate::domain::runner::SignalTable;
use crate::domain::screener::StockSnapshot;
use crate::domain::volatility::VolatilityReport;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReportAdapter {
    pub pretty: bool,
}

/// Row records in header order: date, close, indicator columns, then
/// `<key>_signal` / `<key>_position` pairs.
pub fn table_records(table: &SignalTable) -> Vec<Value> {
    table
        .rows
        .iter()
        .map(|row| {
            let mut record = Map::new();
            record.insert("date".into(), json!(row.date));
            record.insert("close".into(), json!(row.close));
            for (column, value) in table.indicator_columns.iter().zip(&row.indicators) {
                record.insert(column.column_name(), json!(value));
            }
            for (i, key) in table.strategy_keys.iter().enumerate() {
                record.insert(format!("{}_signal", key), json!(row.signals[i]));
                record.insert(format!("{}_position", key), json!(row.positions[i]));
            }
            Value::Object(record)
        })
        .collect()
}

pub fn table_document(table: &SignalTable, metadata: &Metadata) -> Value {
    json!({
        "symbol": table.symbol,
        "data": table_records(table),
        "metadata": metadata,
    })
}

impl JsonReportAdapter {
    fn emit(&self, value: &Value, out: &mut dyn Write) -> Result<(), StockeaseError> {
        let result = if self.pretty {
            serde_json::to_writer_pretty(&mut *out, value)
        } else {
            serde_json::to_writer(&mut *out, value)
        };
        result.map_err(std::io::Error::from)?;
        writeln!(out)?;
        Ok(())
    }
}

impl ReportPort for JsonReportAdapter {
    fn write_table(
        &self,
        table: &SignalTable,
        metadata: &Metadata,
        out: &mut dyn Write,
    ) -> Result<(), StockeaseError> {
        self.emit(&table_document(table, metadata), out)
    }

    fn write_snapshots(
        &self,
        snapshots: &[StockSnapshot],
        out: &mut dyn Write,
    ) -> Result<(), StockeaseError> {
        self.emit(&json!({ "stocks": snapshots }), out)
    }

    fn write_volatility(
        &self,
        report: &VolatilityReport,
        out: &mut dyn Write,
    ) -> Result<(), StockeaseError> {
        self.emit(&json!(report), out)
    }
}
