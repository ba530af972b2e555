//! CLI integration tests.
//!
//! Tests cover:
//! - Engine config loading from real INI files on disk
//! - Command functions against a CSV directory, in JSON and CSV output
//! - Exit codes for missing data and bad configuration
//! - SQLite import followed by queries (feature `sqlite`)

mod common;

use clap::Parser;
use common::*;
use std::path::Path;
use std::process::ExitCode;
use stockease::cli::{self, Cli, ReportFormat};
use stockease::domain::engine_config::{DataSource, EngineConfig};
use stockease::domain::error::StockeaseError;

fn csv_engine(dir: &Path) -> EngineConfig {
    let ini = write_temp_ini(&format!(
        "[data]\nsource = csv\ncsv_dir = {}\n[signals]\ngolden_cross_rows = 50\n",
        dir.display()
    ));
    cli::load_engine_config(Some(ini.path())).unwrap()
}

fn seeded_dir() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().unwrap();
    write_csv(dir.path(), "NABIL", &wave_bars("NABIL", 300, 500.0, 60.0, 40.0));
    write_csv(dir.path(), "NICA", &generate_bars("NICA", 30, 80.0, 0.5));
    dir
}

mod config_loading {
    use super::*;

    #[test]
    fn csv_source_from_ini() {
        let dir = seeded_dir();
        let engine = csv_engine(dir.path());
        assert_eq!(
            engine.data_source,
            DataSource::Csv {
                dir: dir.path().to_path_buf()
            }
        );
        assert_eq!(engine.golden_cross.max_rows, 50);
        assert_eq!(engine.crossover_rows, 300);
    }

    #[test]
    fn invalid_ini_value_maps_to_config_exit_code() {
        let ini = write_temp_ini("[signals]\ngolden_cross_fast = 300\n");
        let err = cli::load_engine_config(Some(ini.path())).unwrap_err();
        assert!(matches!(err, StockeaseError::ConfigInvalid { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::from(2));
    }
}

mod commands {
    use super::*;

    #[test]
    fn golden_cross_json_respects_configured_rows() {
        let dir = seeded_dir();
        let engine = csv_engine(dir.path());
        let mut out = Vec::new();

        cli::run_golden_cross(&engine, "NABIL", None, ReportFormat::Json, &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["data"].as_array().unwrap().len(), 50);
        assert_eq!(json["symbol"], "NABIL");
    }

    #[test]
    fn crossover_csv_with_row_override() {
        let dir = seeded_dir();
        let engine = csv_engine(dir.path());
        let mut out = Vec::new();

        cli::run_crossover(&engine, "NABIL", Some(10), ReportFormat::Csv, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert!(lines[0].starts_with("date,close,MA50,MA200,EMA9,EMA21,EMA20,EMA50,"));
        assert!(lines[0].ends_with("ema_medium_signal,ema_medium_position"));
    }

    #[test]
    fn zero_rows_is_invalid_parameter() {
        let dir = seeded_dir();
        let engine = csv_engine(dir.path());
        let err = cli::run_crossover(&engine, "NABIL", Some(0), ReportFormat::Json, &mut Vec::new())
            .unwrap_err();
        assert_eq!(ExitCode::from(&err), ExitCode::from(4));
    }

    #[test]
    fn volatility_csv_row() {
        let dir = seeded_dir();
        let engine = csv_engine(dir.path());
        let mut out = Vec::new();

        cli::run_volatility(&engine, "NICA", Some(date(2020, 1, 15)), Some(10), ReportFormat::Csv, &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("symbol,as_of,lookback,volatility\nNICA,2020-01-15,10,"));
    }

    #[test]
    fn missing_symbol_exits_with_no_data_code() {
        let dir = seeded_dir();
        let engine = csv_engine(dir.path());
        let err = cli::run_golden_cross(&engine, "NONE", None, ReportFormat::Json, &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, StockeaseError::NoData { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::from(5));
    }

    #[test]
    fn run_reports_config_failure_exit_code() {
        let cli = Cli::try_parse_from([
            "stockease",
            "--config",
            "/nonexistent/stockease.ini",
            "symbols",
        ])
        .unwrap();
        assert_eq!(cli::run(cli), ExitCode::from(2));
    }
}

#[cfg(feature = "sqlite")]
mod import {
    use super::*;
    use stockease::adapters::sqlite_adapter::SqliteAdapter;
    use stockease::ports::data_port::DataPort;

    #[test]
    fn folder_import_then_query() {
        let csv_dir = seeded_dir();
        let db_dir = tempfile::TempDir::new().unwrap();
        let db_path = db_dir.path().join("stockease.db");
        let ini = write_temp_ini(&format!(
            "[data]\nsource = sqlite\n[sqlite]\npath = {}\npool_size = 2\n",
            db_path.display()
        ));
        let config = ini.path().to_str().unwrap();
        let folder = csv_dir.path().to_str().unwrap();

        let import = Cli::try_parse_from(["stockease", "--config", config, "import", "--folder", folder])
            .unwrap();
        assert_eq!(cli::run(import), ExitCode::SUCCESS);

        // A second import replaces rows instead of duplicating them.
        let again = Cli::try_parse_from(["stockease", "--config", config, "import", "--folder", folder])
            .unwrap();
        assert_eq!(cli::run(again), ExitCode::SUCCESS);

        let store = SqliteAdapter::open(&db_path, 1).unwrap();
        assert_eq!(store.list_symbols().unwrap(), vec!["NABIL", "NICA"]);
        let (_, _, count) = store.get_data_range("NABIL").unwrap().unwrap();
        assert_eq!(count, 300);

        let engine = cli::load_engine_config(Some(ini.path())).unwrap();
        let mut out = Vec::new();
        cli::run_golden_cross(&engine, "NABIL", None, ReportFormat::Json, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["data"].as_array().unwrap().len(), 101);
    }

    #[test]
    fn partial_folder_import_fails_with_ingest_code() {
        let csv_dir = seeded_dir();
        std::fs::write(
            csv_dir.path().join("BAD.csv"),
            "date,open,high,low,close,volume\n2024-01-01,1,1,1,-1,10\n",
        )
        .unwrap();
        let db_dir = tempfile::TempDir::new().unwrap();
        let db_path = db_dir.path().join("stockease.db");
        let ini = write_temp_ini(&format!(
            "[data]\nsource = sqlite\n[sqlite]\npath = {}\n",
            db_path.display()
        ));

        let import = Cli::try_parse_from([
            "stockease",
            "--config",
            ini.path().to_str().unwrap(),
            "import",
            "--folder",
            csv_dir.path().to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(cli::run(import), ExitCode::from(3));

        // Good files are still stored.
        let store = SqliteAdapter::open(&db_path, 1).unwrap();
        assert_eq!(store.list_symbols().unwrap(), vec!["NABIL", "NICA"]);
    }

    #[test]
    fn import_requires_sqlite_source() {
        let csv_dir = seeded_dir();
        let ini = write_temp_ini("[data]\nsource = csv\n");
        let file = csv_dir.path().join("NICA.csv");

        let cli = Cli::try_parse_from([
            "stockease",
            "--config",
            ini.path().to_str().unwrap(),
            "import",
            "--file",
            file.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(cli::run(cli), ExitCode::from(2));
    }
}
