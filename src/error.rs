//! Error types for highlight document parsing

use thiserror::Error;

/// A game key that is not a Markdown link
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("title and URL parsing failed for {input:?}, expected \"[Game name](https://...)\"")]
pub struct LinkFormatError {
    pub input: String,
}

/// A highlight line that does not start with a timestamp followed by the delimiter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampFormatError {
    #[error("delimiter {delimiter:?} not found in highlight {line:?}")]
    MissingDelimiter { line: String, delimiter: String },

    #[error("timestamp {timestamp:?} in highlight {line:?} is neither MM:SS nor HH:MM:SS")]
    InvalidTime { line: String, timestamp: String },
}

/// Underlying parse failure carried by a [`DocumentFormatError`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatCause {
    #[error(transparent)]
    Link(#[from] LinkFormatError),

    #[error(transparent)]
    Timestamp(#[from] TimestampFormatError),
}

/// A highlight document that does not have the expected shape.
///
/// The message points at the offending tournament, game or line and at the
/// format that was expected there, so hand-written documents can be fixed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DocumentFormatError {
    message: String,
    #[source]
    cause: Option<FormatCause>,
}

impl DocumentFormatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: impl Into<FormatCause>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&FormatCause> {
        self.cause.as_ref()
    }
}
