//! Strategy descriptors: named fast/slow line pairs.

use crate::domain::indicator::IndicatorType;

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyDescriptor {
    pub key: String,
    pub name: String,
    pub category: String,
    pub fast: IndicatorType,
    pub slow: IndicatorType,
}

impl StrategyDescriptor {
    pub fn new(key: &str, name: &str, category: &str, fast: IndicatorType, slow: IndicatorType) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            fast,
            slow,
        }
    }

    pub fn signal_column(&self) -> String {
        format!("{}_signal", self.key)
    }

    pub fn position_column(&self) -> String {
        format!("{}_position", self.key)
    }
}

/// SMA 50/200 golden cross, EMA 9/21 and EMA 20/50.
pub fn default_strategies() -> Vec<StrategyDescriptor> {
    vec![
        StrategyDescriptor::new(
            "golden_cross",
            "Golden Cross (50/200 MA)",
            "Long-term Trend",
            IndicatorType::Sma(50),
            IndicatorType::Sma(200),
        ),
        StrategyDescriptor::new(
            "ema_short",
            "Short-term EMA (9/21)",
            "Short-term Trend",
            IndicatorType::Ema(9),
            IndicatorType::Ema(21),
        ),
        StrategyDescriptor::new(
            "ema_medium",
            "Medium-term EMA (20/50)",
            "Medium-term Trend",
            IndicatorType::Ema(20),
            IndicatorType::Ema(50),
        ),
    ]
}

/// Distinct indicators needed by `strategies`, in first-use order.
pub fn required_indicators(strategies: &[StrategyDescriptor]) -> Vec<IndicatorType> {
    let mut required: Vec<IndicatorType> = Vec::new();
    for strategy in strategies {
        for indicator in [strategy.fast, strategy.slow] {
            if !required.contains(&indicator) {
                required.push(indicator);
            }
        }
    }
    required
}
