//! Error types for the OpenIO SDS proxy client.
//!
//! [`SdsError`] is the structured error surfaced by every proxy call: a numeric
//! code (0 when unspecified), a human-readable message, and an optional causal
//! chain. [`CoreError`] covers local validation failures that never reach the
//! network.

use std::error::Error as StdError;
use std::fmt;

/// Local errors raised while building identifiers or loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An identifier field could not be accepted.
    #[error("invalid OIO URL: {0}")]
    InvalidUrl(String),

    /// A content fullpath could not be encoded or decoded.
    #[error("{0}")]
    FullPath(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for local operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Structured error reported by proxy calls.
///
/// Each layer handling the error may add context without replacing it:
/// [`SdsError::prefixed`] rewrites the message in place, while
/// [`SdsError::context`] keeps the original as the `source` of a new error.
#[derive(Debug)]
pub struct SdsError {
    /// Numeric error code, 0 when unspecified.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl SdsError {
    /// Create an error with the given code and message.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create an error with an unspecified (zero) code.
    #[must_use]
    pub fn unspecified(message: impl Into<String>) -> Self {
        Self::new(0, message)
    }

    /// Prepend `prefix` to the message, keeping the code and the source.
    #[must_use]
    pub fn prefixed(mut self, prefix: impl AsRef<str>) -> Self {
        self.message.insert_str(0, prefix.as_ref());
        self
    }

    /// Wrap this error as the cause of a new error carrying the same code.
    #[must_use]
    pub fn context(self, message: impl Into<String>) -> Self {
        Self {
            code: self.code,
            message: message.into(),
            source: Some(Box::new(self)),
        }
    }

    /// Attach an underlying source error.
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Render the message followed by every cause, outermost first.
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = self.message.clone();
        let mut cause = self.source();
        while let Some(err) = cause {
            out.push_str(", caused by: ");
            out.push_str(&err.to_string());
            cause = err.source();
        }
        out
    }
}

impl fmt::Display for SdsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for SdsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}
