//! Result formatting port trait.

use std::io::Write;

use crate::domain::error::StockeaseError;
use crate::domain::metadata::Metadata;
use crate::domain::runner::SignalTable;
use crate::domain::screener::StockSnapshot;
use crate::domain::volatility::VolatilityReport;

/// Port for rendering engine results to a byte sink.
pub trait ReportPort {
    fn write_table(
        &self,
        table: &SignalTable,
        metadata: &Metadata,
        out: &mut dyn Write,
    ) -> Result<(), StockeaseError>;

    fn write_snapshots(
        &self,
        snapshots: &[StockSnapshot],
        out: &mut dyn Write,
    ) -> Result<(), StockeaseError>;

    fn write_volatility(
        &self,
        report: &VolatilityReport,
        out: &mut dyn Write,
    ) -> Result<(), StockeaseError>;
}
