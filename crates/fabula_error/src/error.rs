//! Top-level error wrapper types.

use crate::{
    ConfigError, ErrorCategory, JsonError, RetryableError, ServiceError, StorageError,
    StoryError, StoryErrorKind,
};

/// Every error condition the Fabula workspace can surface.
///
/// # Examples
///
/// ```
/// use fabula_error::{ConfigError, FabulaError};
///
/// let err: FabulaError = ConfigError::new("bad retry section").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FabulaErrorKind {
    /// Narrative engine error
    #[from(StoryError)]
    Story(StoryError),
    /// Generative service error
    #[from(ServiceError)]
    Service(ServiceError),
    /// Story store error
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
}

/// Fabula error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaResult, StorageError, StorageErrorKind};
///
/// fn load() -> FabulaResult<()> {
///     Err(StorageError::new(StorageErrorKind::NotFound("abc".to_string())))?
/// }
///
/// assert!(load().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fabula Error: {}", _0)]
pub struct FabulaError(Box<FabulaErrorKind>);

impl FabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: FabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FabulaErrorKind {
        &self.0
    }

    /// Reduce this error to the caller-facing taxonomy.
    pub fn category(&self) -> ErrorCategory {
        match self.kind() {
            FabulaErrorKind::Story(err) => match &err.kind {
                StoryErrorKind::Validation(_) | StoryErrorKind::StaleNode { .. } => {
                    ErrorCategory::Validation
                }
                StoryErrorKind::NotFound(_) => ErrorCategory::NotFound,
                StoryErrorKind::InvalidChoice(_) => ErrorCategory::InvalidChoice,
                StoryErrorKind::Structure(_) => ErrorCategory::Structure,
                StoryErrorKind::AllModelsFailed(_) => ErrorCategory::AllModelsFailed,
            },
            FabulaErrorKind::Service(err) if err.is_retryable() => {
                ErrorCategory::TransientService
            }
            FabulaErrorKind::Storage(err)
                if matches!(err.kind, crate::StorageErrorKind::NotFound(_)) =>
            {
                ErrorCategory::NotFound
            }
            FabulaErrorKind::Service(_)
            | FabulaErrorKind::Storage(_)
            | FabulaErrorKind::Config(_)
            | FabulaErrorKind::Json(_) => ErrorCategory::PermanentService,
        }
    }

    /// Human-readable description without the source location.
    ///
    /// This is the text callers see; the located form from `Display` belongs in logs.
    pub fn message(&self) -> String {
        match self.kind() {
            FabulaErrorKind::Story(err) => err.kind.to_string(),
            FabulaErrorKind::Service(err) => err.kind.to_string(),
            FabulaErrorKind::Storage(err) => err.kind.to_string(),
            FabulaErrorKind::Config(err) => err.message.clone(),
            FabulaErrorKind::Json(err) => err.message.clone(),
        }
    }

    /// Whether the underlying failure is a transient service condition.
    pub fn is_transient(&self) -> bool {
        self.category() == ErrorCategory::TransientService
    }

    /// Borrow the story engine error, if that is what this is.
    pub fn as_story(&self) -> Option<&StoryError> {
        match self.kind() {
            FabulaErrorKind::Story(err) => Some(err),
            _ => None,
        }
    }

    /// Borrow the service error, if that is what this is.
    pub fn as_service(&self) -> Option<&ServiceError> {
        match self.kind() {
            FabulaErrorKind::Service(err) => Some(err),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to FabulaErrorKind
impl<T> From<T> for FabulaError
where
    T: Into<FabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fabula operations.
pub type FabulaResult<T> = std::result::Result<T, FabulaError>;
