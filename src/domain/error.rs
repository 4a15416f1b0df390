//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for signalscore.
///
/// Covers collaborator and configuration failures only. Scoring faults are
/// recoverable and live in [`crate::domain::score::ScoreFault`].
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("data source error: {reason}")]
    Data { reason: String },

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

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error("price series out of order at {date} (previous {previous})")]
    UnorderedSeries { date: NaiveDate, previous: NaiveDate },

    #[error("duplicate date {date} in price series")]
    DuplicateDate { date: NaiveDate },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SignalError> for std::process::ExitCode {
    fn from(err: &SignalError) -> Self {
        let code: u8 = match err {
            SignalError::Io(_) => 1,
            SignalError::ConfigParse { .. }
            | SignalError::ConfigMissing { .. }
            | SignalError::ConfigInvalid { .. } => 2,
            SignalError::Data { .. }
            | SignalError::UnorderedSeries { .. }
            | SignalError::DuplicateDate { .. } => 3,
            SignalError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
