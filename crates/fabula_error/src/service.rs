//! Generative service errors and retry classification.

/// HTTP statuses that signal a temporarily overloaded or failing service.
const TRANSIENT_STATUSES: [u16; 2] = [500, 503];

/// Failure conditions reported by a generative service driver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ServiceErrorKind {
    /// API key not found in environment
    #[display("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,
    /// Failed to create a model client
    #[display("Failed to create client for model '{}': {}", model, message)]
    ClientCreation {
        /// Model identifier the client was built for
        model: String,
        /// Error message
        message: String,
    },
    /// Request failed without an HTTP status (network, decoding, ...)
    #[display("API request failed: {}", _0)]
    ApiRequest(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// The service answered but returned no text
    #[display("Empty response from model '{}'", _0)]
    EmptyResponse(String),
}

impl ServiceErrorKind {
    /// Check if this error signals a transient service condition.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceErrorKind::HttpError { status_code, .. } => {
                TRANSIENT_STATUSES.contains(status_code)
            }
            _ => false,
        }
    }
}

/// Generative service error with source location tracking.
///
/// # Examples
///
/// ```
/// use fabula_error::{RetryableError, ServiceError, ServiceErrorKind};
///
/// let err = ServiceError::new(ServiceErrorKind::HttpError {
///     status_code: 503,
///     message: "The model is overloaded".to_string(),
/// });
/// assert!(err.is_retryable());
///
/// let err = ServiceError::new(ServiceErrorKind::HttpError {
///     status_code: 400,
///     message: "Bad request".to_string(),
/// });
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Service Error: {} at line {} in {}", kind, line, file)]
pub struct ServiceError {
    /// The kind of error that occurred
    pub kind: ServiceErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ServiceError {
    /// Create a new ServiceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ServiceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// Transient errors like 503 (service unavailable) or 500 (internal error)
/// return true. Permanent errors like 401 (unauthorized) or 400 (bad request)
/// return false.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ServiceError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
