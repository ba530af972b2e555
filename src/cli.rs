//! CLI definition and dispatch.
//!
//! Results go to stdout; diagnostics go through `tracing` to stderr.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::engine_config::{DataSource, EngineConfig};
use crate::domain::error::StockeaseError;
use crate::domain::metadata::{golden_cross_metadata, strategy_metadata};
use crate::domain::runner::{run_golden_cross_momentum, StrategyRunner};
use crate::domain::screener::screen;
use crate::domain::volatility::VolatilityReport;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stockease", about = "Technical indicators and crossover signals for daily OHLC data")]
pub struct Cli {
    /// INI configuration file; built-in defaults when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

impl ReportFormat {
    pub fn reporter(self) -> Box<dyn ReportPort> {
        match self {
            ReportFormat::Json => Box::new(JsonReportAdapter { pretty: true }),
            ReportFormat::Csv => Box::new(CsvReportAdapter),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List symbols in the series store
    Symbols,
    /// SMA golden cross gated by RSI momentum
    GoldenCross {
        #[arg(short, long)]
        symbol: String,
        /// Most recent rows to keep
        #[arg(long)]
        rows: Option<usize>,
        #[arg(short, long, value_enum, default_value_t)]
        format: ReportFormat,
    },
    /// Price-confirmed crossover over the default strategy set
    Crossover {
        #[arg(short, long)]
        symbol: String,
        #[arg(long)]
        rows: Option<usize>,
        #[arg(short, long, value_enum, default_value_t)]
        format: ReportFormat,
    },
    /// Annualized volatility over a trailing window
    Volatility {
        #[arg(short, long)]
        symbol: String,
        /// Last date included (YYYY-MM-DD); defaults to the latest bar
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(long)]
        lookback: Option<usize>,
        #[arg(short, long, value_enum, default_value_t)]
        format: ReportFormat,
    },
    /// Latest-bar snapshot of every symbol
    Screener {
        #[arg(short, long, value_enum, default_value_t)]
        format: ReportFormat,
    },
    /// Show data range for one symbol, or all of them
    Info {
        #[arg(short, long)]
        symbol: Option<String>,
    },
    /// Load CSV files into the SQLite store
    Import {
        /// Single CSV file
        #[arg(long, conflicts_with = "folder")]
        file: Option<PathBuf>,
        /// Symbol for --file; defaults to the file stem
        #[arg(short, long, requires = "file")]
        symbol: Option<String>,
        /// Directory of <SYMBOL>.csv files
        #[arg(long)]
        folder: Option<PathBuf>,
    },
    /// Start the HTTP API
    Serve,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = load_engine_config(cli.config.as_deref())
        .and_then(|engine| dispatch(cli.command, &engine));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig, StockeaseError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            EngineConfig::from_config(&FileConfigAdapter::from_file(path)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Opens the configured series store.
pub fn open_data_port(engine: &EngineConfig) -> Result<Box<dyn DataPort + Send + Sync>, StockeaseError> {
    match &engine.data_source {
        DataSource::Csv { dir } => Ok(Box::new(CsvAdapter::new(dir.clone()))),
        #[cfg(feature = "sqlite")]
        DataSource::Sqlite { path, pool_size } => Ok(Box::new(
            crate::adapters::sqlite_adapter::SqliteAdapter::open(path, *pool_size)?,
        )),
        #[cfg(not(feature = "sqlite"))]
        DataSource::Sqlite { .. } => Err(feature_missing("sqlite")),
    }
}

fn feature_missing(feature: &str) -> StockeaseError {
    StockeaseError::InvalidParameter {
        name: "feature".into(),
        value: feature.into(),
        reason: "not compiled into this build".into(),
    }
}

fn dispatch(command: Command, engine: &EngineConfig) -> Result<(), StockeaseError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Symbols => {
            for symbol in open_data_port(engine)?.list_symbols()? {
                writeln!(out, "{}", symbol)?;
            }
            Ok(())
        }
        Command::GoldenCross {
            symbol,
            rows,
            format,
        } => run_golden_cross(engine, &symbol, rows, format, &mut out),
        Command::Crossover {
            symbol,
            rows,
            format,
        } => run_crossover(engine, &symbol, rows, format, &mut out),
        Command::Volatility {
            symbol,
            as_of,
            lookback,
            format,
        } => run_volatility(engine, &symbol, as_of, lookback, format, &mut out),
        Command::Screener { format } => {
            let data_port = open_data_port(engine)?;
            let snapshots = screen(data_port.as_ref(), engine.volatility_lookback)?;
            format.reporter().write_snapshots(&snapshots, &mut out)
        }
        Command::Info { symbol } => run_info(engine, symbol, &mut out),
        Command::Import {
            file,
            symbol,
            folder,
        } => run_import(engine, file, symbol, folder, &mut out),
        Command::Serve => run_serve(engine),
    }
}

pub fn run_golden_cross(
    engine: &EngineConfig,
    symbol: &str,
    rows: Option<usize>,
    format: ReportFormat,
    out: &mut dyn Write,
) -> Result<(), StockeaseError> {
    let mut config = engine.golden_cross.clone();
    if let Some(rows) = rows {
        config.max_rows = rows;
    }

    let series = open_data_port(engine)?.fetch_series(symbol)?;
    let table = run_golden_cross_momentum(&series, &config)?;
    info!(symbol, rows = table.rows.len(), "golden cross computed");
    format
        .reporter()
        .write_table(&table, &golden_cross_metadata(&config), out)
}

pub fn run_crossover(
    engine: &EngineConfig,
    symbol: &str,
    rows: Option<usize>,
    format: ReportFormat,
    out: &mut dyn Write,
) -> Result<(), StockeaseError> {
    let runner = match rows {
        Some(rows) => StrategyRunner::new(engine.strategy_runner()?.strategies().to_vec(), rows)?,
        None => engine.strategy_runner()?,
    };

    let series = open_data_port(engine)?.fetch_series(symbol)?;
    let table = runner.run(&series)?;
    info!(symbol, rows = table.rows.len(), "crossover computed");
    format
        .reporter()
        .write_table(&table, &strategy_metadata(runner.strategies()), out)
}

pub fn run_volatility(
    engine: &EngineConfig,
    symbol: &str,
    as_of: Option<NaiveDate>,
    lookback: Option<usize>,
    format: ReportFormat,
    out: &mut dyn Write,
) -> Result<(), StockeaseError> {
    let lookback = lookback.unwrap_or(engine.volatility_lookback);
    if lookback == 0 {
        return Err(StockeaseError::non_positive("lookback", lookback));
    }

    let series = open_data_port(engine)?.fetch_series(symbol)?;
    let report = VolatilityReport::for_series(&series, as_of, lookback).ok_or_else(|| {
        StockeaseError::NoData {
            symbol: symbol.to_string(),
        }
    })?;
    format.reporter().write_volatility(&report, out)
}

fn run_info(
    engine: &EngineConfig,
    symbol: Option<String>,
    out: &mut dyn Write,
) -> Result<(), StockeaseError> {
    let data_port = open_data_port(engine)?;
    let symbols = match symbol {
        Some(s) => vec![s],
        None => data_port.list_symbols()?,
    };

    for symbol in &symbols {
        match data_port.get_data_range(symbol)? {
            Some((first, last, count)) => {
                writeln!(out, "{}: {} bars, {} to {}", symbol, count, first, last)?;
            }
            None => warn!(symbol = %symbol, "no data found"),
        }
    }
    Ok(())
}

#[cfg(feature = "sqlite")]
fn run_import(
    engine: &EngineConfig,
    file: Option<PathBuf>,
    symbol: Option<String>,
    folder: Option<PathBuf>,
    out: &mut dyn Write,
) -> Result<(), StockeaseError> {
    use crate::adapters::csv_adapter::read_bars;
    use crate::adapters::sqlite_adapter::SqliteAdapter;

    let DataSource::Sqlite { path, pool_size } = &engine.data_source else {
        return Err(StockeaseError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: "import requires source = sqlite".into(),
        });
    };
    let store = SqliteAdapter::open(path, *pool_size)?;

    match (file, folder) {
        (Some(file), _) => {
            let symbol = match symbol {
                Some(s) => s,
                None => file_stem(&file)?,
            };
            let written = store.insert_bars(&read_bars(&file, &symbol)?)?;
            writeln!(out, "{}: {} bars imported", symbol, written)?;
        }
        (None, Some(folder)) => {
            let source_name = folder.display().to_string();
            let source = CsvAdapter::new(folder);
            let symbols = source.list_symbols()?;
            let mut failed = 0usize;
            for symbol in &symbols {
                match source.fetch_bars(symbol).and_then(|bars| store.insert_bars(&bars)) {
                    Ok(written) => writeln!(out, "{}: {} bars imported", symbol, written)?,
                    Err(e) => {
                        warn!(symbol = %symbol, error = %e, "import failed");
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                return Err(StockeaseError::Ingest {
                    source_name,
                    reason: format!("{} of {} files not imported", failed, symbols.len()),
                });
            }
        }
        (None, None) => {
            return Err(StockeaseError::InvalidParameter {
                name: "import".into(),
                value: String::new(),
                reason: "one of --file or --folder is required".into(),
            });
        }
    }
    Ok(())
}

#[cfg(feature = "sqlite")]
fn file_stem(path: &Path) -> Result<String, StockeaseError> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| StockeaseError::InvalidParameter {
            name: "file".into(),
            value: path.display().to_string(),
            reason: "cannot derive a symbol from the file name".into(),
        })
}

#[cfg(not(feature = "sqlite"))]
fn run_import(
    _engine: &EngineConfig,
    _file: Option<PathBuf>,
    _symbol: Option<String>,
    _folder: Option<PathBuf>,
    _out: &mut dyn Write,
) -> Result<(), StockeaseError> {
    Err(feature_missing("sqlite"))
}

fn run_serve(engine: &EngineConfig) -> Result<(), StockeaseError> {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{serve, AppState};
        use std::sync::Arc;

        let state = AppState {
            data_port: Arc::from(open_data_port(engine)?),
            engine: engine.clone(),
        };
        tokio::runtime::Runtime::new()?.block_on(serve(state))
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = engine;
        Err(feature_missing("web"))
    }
}
