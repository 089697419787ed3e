//! Collector error types

use contracts::{ContractError, ReportKind};
use thiserror::Error;

/// Collector error
#[derive(Debug, Error)]
pub enum CollectorError {
    /// Header line carried an integer that does not parse
    #[error("{report} report line {line}: malformed header '{text}': {message}")]
    MalformedHeader {
        /// Report being parsed
        report: ReportKind,
        /// 1-based line number
        line: usize,
        /// Offending line
        text: String,
        /// Parse message
        message: String,
    },

    /// Recognized field whose value cannot be converted
    #[error("{report} report line {line}: invalid value '{value}' for '{key}': {message}")]
    InvalidValue {
        /// Report being parsed
        report: ReportKind,
        /// 1-based line number
        line: usize,
        /// Field name
        key: String,
        /// Raw value
        value: String,
        /// Conversion message
        message: String,
    },

    /// String outside the known yes/no vocabulary
    #[error("unrecognized boolean '{0}'")]
    InvalidBoolean(String),

    /// Running the command failed
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl CollectorError {
    /// Create malformed header error
    pub fn malformed_header(
        report: ReportKind,
        line: usize,
        text: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedHeader {
            report,
            line,
            text: text.into(),
            message: message.into(),
        }
    }

    /// Create invalid value error
    pub fn invalid_value(
        report: ReportKind,
        line: usize,
        key: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            report,
            line,
            key: key.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// True for errors raised while parsing text (as opposed to running the command)
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, Self::Contract(_))
    }
}

/// Collector Result type alias
pub type Result<T> = std::result::Result<T, CollectorError>;
