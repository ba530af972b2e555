//! Domain error types.

/// Top-level error type for stockease.
#[derive(Debug, thiserror::Error)]
pub enum StockeaseError {
    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("rejected bars from {source_name}: {reason}")]
    Ingest { source_name: String, reason: String },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StockeaseError {
    /// Shorthand for a non-positive window or period.
    pub fn non_positive(name: &str, value: usize) -> Self {
        StockeaseError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
            reason: "must be positive".to_string(),
        }
    }
}

impl From<&StockeaseError> for std::process::ExitCode {
    fn from(err: &StockeaseError) -> Self {
        let code: u8 = match err {
            StockeaseError::Io(_) => 1,
            StockeaseError::ConfigParse { .. }
            | StockeaseError::ConfigMissing { .. }
            | StockeaseError::ConfigInvalid { .. } => 2,
            StockeaseError::Database { .. }
            | StockeaseError::DatabaseQuery { .. }
            | StockeaseError::Ingest { .. } => 3,
            StockeaseError::InvalidParameter { .. } => 4,
            StockeaseError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
