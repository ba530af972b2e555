//! Configuration validation.
//!
//! Validates every engine setting before anything is computed. Numeric keys
//! are read as raw strings so a malformed value fails instead of silently
//! falling back to its default.

use crate::domain::error::StockeaseError;
use crate::ports::config_port::ConfigPort;

pub const DATA_SOURCES: &[&str] = &["csv", "sqlite"];

pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), StockeaseError> {
    validate_data_source(config)?;
    validate_windows(config)?;
    validate_golden_cross_order(config)?;
    validate_momentum_threshold(config)?;
    Ok(())
}

/// Reads a strictly positive integer, `default` when the key is absent.
pub fn positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, StockeaseError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(default);
    };
    let value: i64 = raw.trim().parse().map_err(|_| invalid(section, key, "must be an integer"))?;
    if value <= 0 {
        return Err(invalid(section, key, &format!("must be positive, got {}", value)));
    }
    Ok(value as usize)
}

/// Reads `[sqlite] pool_size`, which must fit the pool's `u32` bound.
pub fn pool_size(config: &dyn ConfigPort) -> Result<u32, StockeaseError> {
    let value = positive_int(config, "sqlite", "pool_size", 4)?;
    u32::try_from(value).map_err(|_| {
        invalid(
            "sqlite",
            "pool_size",
            &format!("must be at most {}, got {}", u32::MAX, value),
        )
    })
}

/// Reads a finite float, `default` when the key is absent.
pub fn finite_float(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, StockeaseError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(section, key, "must be a number")),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> StockeaseError {
    StockeaseError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), StockeaseError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string());
    let source = source.trim().to_lowercase();

    if !DATA_SOURCES.contains(&source.as_str()) {
        return Err(invalid(
            "data",
            "source",
            &format!("must be one of {}", DATA_SOURCES.join(", ")),
        ));
    }
    if source == "sqlite" && config.get_string("sqlite", "path").is_none() {
        return Err(StockeaseError::ConfigMissing {
            section: "sqlite".to_string(),
            key: "path".to_string(),
        });
    }
    pool_size(config)?;
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), StockeaseError> {
    for key in [
        "max_rows",
        "golden_cross_rows",
        "golden_cross_fast",
        "golden_cross_slow",
        "rsi_period",
    ] {
        positive_int(config, "signals", key, 1)?;
    }
    positive_int(config, "volatility", "lookback_days", 1)?;
    Ok(())
}

fn validate_golden_cross_order(config: &dyn ConfigPort) -> Result<(), StockeaseError> {
    let fast = positive_int(config, "signals", "golden_cross_fast", 50)?;
    let slow = positive_int(config, "signals", "golden_cross_slow", 200)?;
    if fast >= slow {
        return Err(invalid(
            "signals",
            "golden_cross_fast",
            "golden_cross_fast must be below golden_cross_slow",
        ));
    }
    Ok(())
}

fn validate_momentum_threshold(config: &dyn ConfigPort) -> Result<(), StockeaseError> {
    let value = finite_float(config, "signals", "momentum_threshold", 50.0)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(
            "signals",
            "momentum_threshold",
            "momentum_threshold must be between 0 and 100",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn assert_invalid(content: &str, expected_key: &str) {
        match validate_engine_config(&config(content)) {
            Err(StockeaseError::ConfigInvalid { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected ConfigInvalid for {}, got {:?}", expected_key, other),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        assert!(validate_engine_config(&config("")).is_ok());
    }

    #[test]
    fn full_config_is_valid() {
        let content = "\
[data]
source = sqlite
[sqlite]
path = /tmp/stockease.db
pool_size = 2
[signals]
max_rows = 300
golden_cross_rows = 200
golden_cross_fast = 50
golden_cross_slow = 200
rsi_period = 14
momentum_threshold = 55.5
[volatility]
lookback_days = 20
";
        assert!(validate_engine_config(&config(content)).is_ok());
    }

    #[test]
    fn unknown_source_rejected() {
        assert_invalid("[data]\nsource = parquet\n", "source");
    }

    #[test]
    fn sqlite_requires_path() {
        let err = validate_engine_config(&config("[data]\nsource = sqlite\n")).unwrap_err();
        assert!(matches!(err, StockeaseError::ConfigMissing { ref key, .. } if key == "path"));
    }

    #[test]
    fn oversized_pool_rejected() {
        let content = "[data]\nsource = sqlite\n[sqlite]\npath = /tmp/s.db\npool_size = 4294967296\n";
        assert_invalid(content, "pool_size");
        assert!(matches!(
            pool_size(&config(content)),
            Err(StockeaseError::ConfigInvalid { ref key, .. }) if key == "pool_size"
        ));
        assert_eq!(pool_size(&config("[sqlite]\npool_size = 4294967295\n")).unwrap(), u32::MAX);
    }

    #[test]
    fn zero_window_rejected() {
        assert_invalid("[signals]\nrsi_period = 0\n", "rsi_period");
    }

    #[test]
    fn negative_rows_rejected() {
        assert_invalid("[signals]\nmax_rows = -5\n", "max_rows");
    }

    #[test]
    fn non_numeric_window_rejected() {
        assert_invalid("[volatility]\nlookback_days = month\n", "lookback_days");
    }

    #[test]
    fn fast_must_be_below_slow() {
        assert_invalid(
            "[signals]\ngolden_cross_fast = 200\ngolden_cross_slow = 50\n",
            "golden_cross_fast",
        );
    }

    #[test]
    fn threshold_out_of_range() {
        assert_invalid("[signals]\nmomentum_threshold = 120\n", "momentum_threshold");
        assert_invalid("[signals]\nmomentum_threshold = high\n", "momentum_threshold");
    }

    #[test]
    fn positive_int_default_when_absent() {
        assert_eq!(positive_int(&config(""), "signals", "max_rows", 300).unwrap(), 300);
        assert_eq!(
            positive_int(&config("[signals]\nmax_rows = 42\n"), "signals", "max_rows", 300).unwrap(),
            42
        );
    }
}
