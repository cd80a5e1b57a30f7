use std::fmt::Display;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The submitted `transaction_date` is not a valid ISO-8601 timestamp.
    /// Raised before any rule runs or any log mutates; the message is the
    /// wire-level client error text.
    #[error("Invalid date format. Use ISO format YYYY-MM-DDTHH:MM:SS")]
    InvalidTimestamp {
        value: String
    },
    /// The historical source could not be opened at load time. The store
    /// degrades to "no history"; this is logged, never fatal.
    #[error("Historical source unavailable at path: {path}")]
    DataUnavailable {
        path: String
    },
    /// Materializing the logs failed. The in-memory sequences are intact
    /// and a later flush retries from the same watermark.
    #[error("Log flush failed: {detail}")]
    WriteFailure {
        detail: String
    }
}

impl EngineError {
    pub fn invalid_timestamp(value: &str) -> Self {
        Self::InvalidTimestamp { value: value.to_string() }
    }

    pub fn data_unavailable(path: &Path) -> Self {
        Self::DataUnavailable { path: path.display().to_string() }
    }

    pub fn write_failure(error: impl Display) -> Self {
        Self::WriteFailure { detail: error.to_string() }
    }
}
