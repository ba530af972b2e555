//! Static descriptive metadata shipped alongside result tables.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::indicator::IndicatorType;
use crate::domain::runner::GoldenCrossConfig;
use crate::domain::strategy::StrategyDescriptor;

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_NEUTRAL: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thresholds {
    pub overbought: f64,
    pub oversold: f64,
    pub neutral: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorInfo {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub category: String,
    pub short_ma: String,
    pub long_ma: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metadata {
    Indicators {
        indicators: BTreeMap<String, IndicatorInfo>,
    },
    Strategies {
        strategies: BTreeMap<String, StrategyInfo>,
    },
}

pub fn describe(indicator: IndicatorType) -> IndicatorInfo {
    match indicator {
        IndicatorType::Rsi(period) => IndicatorInfo {
            name: "Relative Strength Index".to_string(),
            description: format!(
                "{}-period momentum indicator showing overbought (>{}) and oversold (<{}) conditions",
                period, RSI_OVERBOUGHT, RSI_OVERSOLD
            ),
            thresholds: Some(Thresholds {
                overbought: RSI_OVERBOUGHT,
                oversold: RSI_OVERSOLD,
                neutral: RSI_NEUTRAL,
            }),
        },
        IndicatorType::Sma(window) => IndicatorInfo {
            name: format!("{}-day Moving Average", window),
            description: format!("{} trend indicator", horizon(window)),
            thresholds: None,
        },
        IndicatorType::Ema(window) => IndicatorInfo {
            name: format!("{}-day Exponential Moving Average", window),
            description: format!("{} trend indicator weighted toward recent closes", horizon(window)),
            thresholds: None,
        },
    }
}

fn horizon(window: usize) -> &'static str {
    match window {
        0..=30 => "Short-term",
        31..=100 => "Medium-term",
        _ => "Long-term",
    }
}

pub fn golden_cross_metadata(config: &GoldenCrossConfig) -> Metadata {
    let indicators = [config.rsi(), config.fast(), config.slow()]
        .into_iter()
        .map(|indicator| (indicator.column_name(), describe(indicator)))
        .collect();
    Metadata::Indicators { indicators }
}

pub fn strategy_metadata(strategies: &[StrategyDescriptor]) -> Metadata {
    let strategies = strategies
        .iter()
        .map(|s| {
            (
                s.key.clone(),
                StrategyInfo {
                    name: s.name.clone(),
                    category: s.category.clone(),
                    short_ma: s.fast.column_name(),
                    long_ma: s.slow.column_name(),
                },
            )
        })
        .collect();
    Metadata::Strategies { strategies }
}
