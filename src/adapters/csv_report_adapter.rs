//! CSV report adapter. Metadata has no tabular form and is not written.

use std::io::Write;

use crate::domain::error::StockeaseError;
use crate::domain::metadata::Metadata;
use crate::domain::runner::SignalTable;
use crate::domain::screener::StockSnapshot;
use crate::domain::volatility::VolatilityReport;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReportAdapter;

fn csv_error(e: csv::Error) -> StockeaseError {
    StockeaseError::Io(std::io::Error::other(e))
}

fn write_rows(out: &mut dyn Write, header: Vec<String>, rows: Vec<Vec<String>>) -> Result<(), StockeaseError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&header).map_err(csv_error)?;
    for row in rows {
        writer.write_record(&row).map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ReportPort for CsvReportAdapter {
    fn write_table(
        &self,
        table: &SignalTable,
        _metadata: &Metadata,
        out: &mut dyn Write,
    ) -> Result<(), StockeaseError> {
        let rows = table
            .rows
            .iter()
            .map(|row| {
                let mut record = vec![row.date.to_string(), row.close.to_string()];
                record.extend(row.indicators.iter().map(f64::to_string));
                for (signal, position) in row.signals.iter().zip(&row.positions) {
                    record.push(signal.code().to_string());
                    record.push(position.to_string());
                }
                record
            })
            .collect();
        write_rows(out, table.header(), rows)
    }

    fn write_snapshots(
        &self,
        snapshots: &[StockSnapshot],
        out: &mut dyn Write,
    ) -> Result<(), StockeaseError> {
        let header = ["symbol", "date", "close", "previous_close", "change_pct", "volume", "volatility"]
            .map(String::from)
            .to_vec();
        let rows = snapshots
            .iter()
            .map(|s| {
                vec![
                    s.symbol.clone(),
                    s.date.to_string(),
                    s.close.to_string(),
                    optional(s.previous_close),
                    optional(s.change_pct()),
                    s.volume.to_string(),
                    optional(s.volatility.percent()),
                ]
            })
            .collect();
        write_rows(out, header, rows)
    }

    fn write_volatility(
        &self,
        report: &VolatilityReport,
        out: &mut dyn Write,
    ) -> Result<(), StockeaseError> {
        let header = ["symbol", "as_of", "lookback", "volatility"]
            .map(String::from)
            .to_vec();
        let row = vec![
            report.symbol.clone(),
            report.as_of.to_string(),
            report.lookback.to_string(),
            optional(report.volatility.percent()),
        ];
        write_rows(out, header, vec![row])
    }
}
