//! Errors raised when Fabula's own values fail to encode as JSON.
//!
//! Model output that fails to parse is a story structure error, not this.

/// Encoding a story, record or summary for output failed.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// Message from the serializer
    pub message: String,
    /// Line of the failing call
    pub line: u32,
    /// Source file of the failing call
    pub file: &'static str,
}

impl JsonError {
    /// Wrap a serializer message, recording the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_error::{ErrorCategory, FabulaError, JsonError};
    ///
    /// let err: FabulaError = JsonError::new("key must be a string").into();
    /// assert_eq!(err.category(), ErrorCategory::PermanentService);
    /// assert_eq!(err.message(), "key must be a string");
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
