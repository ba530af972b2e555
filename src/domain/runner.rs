//! Strategy runner: indicators, signals and positions for one price series,
//! assembled into a date-indexed table of fully-defined rows.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::error::StockeaseError;
use crate::domain::indicator::{compute_indicators, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{golden_cross_signals, positions, price_confirmed_signals, MomentumFilter, Signal};
use crate::domain::strategy::{default_strategies, required_indicators, StrategyDescriptor};

pub const DEFAULT_CROSSOVER_ROWS: usize = 300;
pub const GOLDEN_CROSS_MOMENTUM_KEY: &str = "golden_cross_momentum";

#[derive(Debug, Clone, PartialEq)]
pub struct SignalRow {
    pub date: NaiveDate,
    pub close: f64,
    /// Same order as [`SignalTable::indicator_columns`].
    pub indicators: Vec<f64>,
    /// Same order as [`SignalTable::strategy_keys`].
    pub signals: Vec<Signal>,
    pub positions: Vec<i8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalTable {
    pub symbol: String,
    pub indicator_columns: Vec<IndicatorType>,
    pub strategy_keys: Vec<String>,
    pub rows: Vec<SignalRow>,
}

impl SignalTable {
    /// Flat header: date, close, indicator columns, then signal and position
    /// columns per strategy.
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["date".to_string(), "close".to_string()];
        header.extend(self.indicator_columns.iter().map(|c| c.column_name()));
        for key in &self.strategy_keys {
            header.push(format!("{}_signal", key));
            header.push(format!("{}_position", key));
        }
        header
    }
}

/// Runs the price-confirmed crossover for every descriptor over one series.
#[derive(Debug, Clone)]
pub struct StrategyRunner {
    strategies: Vec<StrategyDescriptor>,
    max_rows: usize,
}

impl Default for StrategyRunner {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            max_rows: DEFAULT_CROSSOVER_ROWS,
        }
    }
}

impl StrategyRunner {
    pub fn new(strategies: Vec<StrategyDescriptor>, max_rows: usize) -> Result<Self, StockeaseError> {
        if max_rows == 0 {
            return Err(StockeaseError::non_positive("max_rows", max_rows));
        }
        Ok(Self {
            strategies,
            max_rows,
        })
    }

    pub fn strategies(&self) -> &[StrategyDescriptor] {
        &self.strategies
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn run(&self, series: &PriceSeries) -> Result<SignalTable, StockeaseError> {
        ensure_has_data(series)?;

        let columns = required_indicators(&self.strategies);
        let computed = compute_indicators(series.closes(), &columns)?;

        let mut strategy_signals = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let signals = price_confirmed_signals(
                &computed[&strategy.fast],
                &computed[&strategy.slow],
                series.closes(),
            )?;
            strategy_signals.push((strategy.key.clone(), signals));
        }

        Ok(assemble(series, columns, &computed, strategy_signals, self.max_rows))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoldenCrossConfig {
    pub fast_window: usize,
    pub slow_window: usize,
    pub rsi_period: usize,
    pub momentum_threshold: f64,
    pub max_rows: usize,
}

impl Default for GoldenCrossConfig {
    fn default() -> Self {
        Self {
            fast_window: 50,
            slow_window: 200,
            rsi_period: 14,
            momentum_threshold: 50.0,
            max_rows: 200,
        }
    }
}

impl GoldenCrossConfig {
    pub fn fast(&self) -> IndicatorType {
        IndicatorType::Sma(self.fast_window)
    }

    pub fn slow(&self) -> IndicatorType {
        IndicatorType::Sma(self.slow_window)
    }

    pub fn rsi(&self) -> IndicatorType {
        IndicatorType::Rsi(self.rsi_period)
    }
}

/// SMA golden cross gated by RSI momentum, with level-triggered exits.
pub fn run_golden_cross_momentum(
    series: &PriceSeries,
    config: &GoldenCrossConfig,
) -> Result<SignalTable, StockeaseError> {
    ensure_has_data(series)?;
    if config.max_rows == 0 {
        return Err(StockeaseError::non_positive("max_rows", config.max_rows));
    }

    let columns = vec![config.fast(), config.slow(), config.rsi()];
    let computed = compute_indicators(series.closes(), &columns)?;

    let filter = MomentumFilter {
        series: &computed[&config.rsi()],
        threshold: config.momentum_threshold,
    };
    let signals = golden_cross_signals(
        &computed[&config.fast()],
        &computed[&config.slow()],
        Some(filter),
    )?;

    Ok(assemble(
        series,
        columns,
        &computed,
        vec![(GOLDEN_CROSS_MOMENTUM_KEY.to_string(), signals)],
        config.max_rows,
    ))
}

fn ensure_has_data(series: &PriceSeries) -> Result<(), StockeaseError> {
    if series.is_empty() {
        return Err(StockeaseError::NoData {
            symbol: series.symbol().to_string(),
        });
    }
    Ok(())
}

/// Zips the per-column series on the shared date index, keeps rows where every
/// indicator is defined and truncates to the most recent `max_rows`.
///
/// Positions are differenced over the full series before rows are dropped.
fn assemble(
    series: &PriceSeries,
    columns: Vec<IndicatorType>,
    computed: &HashMap<IndicatorType, IndicatorSeries>,
    strategy_signals: Vec<(String, Vec<Signal>)>,
    max_rows: usize,
) -> SignalTable {
    let lines: Vec<&IndicatorSeries> = columns.iter().map(|c| &computed[c]).collect();
    let strategy_positions: Vec<Vec<i8>> = strategy_signals
        .iter()
        .map(|(_, signals)| positions(signals))
        .collect();

    let mut rows: Vec<SignalRow> = Vec::new();
    for (i, (&date, &close)) in series.dates().iter().zip(series.closes()).enumerate() {
        let Some(indicators) = lines.iter().map(|line| line.get(i)).collect::<Option<Vec<f64>>>()
        else {
            continue;
        };
        rows.push(SignalRow {
            date,
            close,
            indicators,
            signals: strategy_signals.iter().map(|(_, s)| s[i]).collect(),
            positions: strategy_positions.iter().map(|p| p[i]).collect(),
        });
    }

    let defined = rows.len();
    let rows = rows.split_off(defined.saturating_sub(max_rows));
    debug!(
        symbol = series.symbol(),
        bars = series.len(),
        defined,
        returned = rows.len(),
        "assembled signal table"
    );

    SignalTable {
        symbol: series.symbol().to_string(),
        indicator_columns: columns,
        strategy_keys: strategy_signals.into_iter().map(|(key, _)| key).collect(),
        rows,
    }
}
