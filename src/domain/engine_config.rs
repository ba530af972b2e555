//! Typed engine settings built from a validated [`ConfigPort`].

use std::path::PathBuf;

use crate::domain::config_validation::{finite_float, pool_size, positive_int, validate_engine_config};
use crate::domain::error::StockeaseError;
use crate::domain::runner::{GoldenCrossConfig, StrategyRunner, DEFAULT_CROSSOVER_ROWS};
use crate::domain::strategy::default_strategies;
use crate::domain::volatility::DEFAULT_LOOKBACK_DAYS;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Csv { dir: PathBuf },
    Sqlite { path: PathBuf, pool_size: u32 },
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub data_source: DataSource,
    pub crossover_rows: usize,
    pub golden_cross: GoldenCrossConfig,
    pub volatility_lookback: usize,
    pub listen: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::Csv {
                dir: PathBuf::from("data"),
            },
            crossover_rows: DEFAULT_CROSSOVER_ROWS,
            golden_cross: GoldenCrossConfig::default(),
            volatility_lookback: DEFAULT_LOOKBACK_DAYS,
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockeaseError> {
        validate_engine_config(config)?;
        let defaults = EngineConfig::default();
        let gc_defaults = defaults.golden_cross;

        let source = config
            .get_string("data", "source")
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_else(|| "csv".to_string());
        let data_source = match source.as_str() {
            "sqlite" => DataSource::Sqlite {
                path: config
                    .get_string("sqlite", "path")
                    .map(PathBuf::from)
                    .ok_or_else(|| StockeaseError::ConfigMissing {
                        section: "sqlite".into(),
                        key: "path".into(),
                    })?,
                pool_size: pool_size(config)?,
            },
            _ => DataSource::Csv {
                dir: config
                    .get_string("data", "csv_dir")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("data")),
            },
        };

        Ok(Self {
            data_source,
            crossover_rows: positive_int(config, "signals", "max_rows", defaults.crossover_rows)?,
            golden_cross: GoldenCrossConfig {
                fast_window: positive_int(config, "signals", "golden_cross_fast", gc_defaults.fast_window)?,
                slow_window: positive_int(config, "signals", "golden_cross_slow", gc_defaults.slow_window)?,
                rsi_period: positive_int(config, "signals", "rsi_period", gc_defaults.rsi_period)?,
                momentum_threshold: finite_float(
                    config,
                    "signals",
                    "momentum_threshold",
                    gc_defaults.momentum_threshold,
                )?,
                max_rows: positive_int(config, "signals", "golden_cross_rows", gc_defaults.max_rows)?,
            },
            volatility_lookback: positive_int(
                config,
                "volatility",
                "lookback_days",
                defaults.volatility_lookback,
            )?,
            listen: config
                .get_string("web", "listen")
                .unwrap_or(defaults.listen),
        })
    }

    /// Runner over the default strategy set with the configured row limit.
    pub fn strategy_runner(&self) -> Result<StrategyRunner, StockeaseError> {
        StrategyRunner::new(default_strategies(), self.crossover_rows)
    }
}
