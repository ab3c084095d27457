//! Story engine error types.

/// Specific error conditions raised by the narrative engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoryErrorKind {
    /// Caller input was malformed or missing
    #[display("Invalid request: {}", _0)]
    Validation(String),
    /// Story or node absent from persisted state
    #[display("Not found: {}", _0)]
    NotFound(String),
    /// Selected choice is not offered by the current node
    #[display("Invalid choice: {}", _0)]
    InvalidChoice(String),
    /// Caller continued from a node that is no longer current
    #[display("Node '{}' is not the current node (current is '{}')", requested, current)]
    StaleNode {
        /// Node id supplied by the caller
        requested: String,
        /// Node id the graph currently points at
        current: String,
    },
    /// Model output failed schema validation
    #[display("Invalid model output: {}", _0)]
    Structure(String),
    /// The fallback chain ended without a usable payload
    #[display("All models failed to produce a {}", _0)]
    AllModelsFailed(String),
}

/// Error type for story engine operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::Validation("premise is required".to_string()));
/// assert!(format!("{}", err).contains("premise is required"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The specific error condition
    pub kind: StoryErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a [`StoryErrorKind::Structure`] error.
    #[track_caller]
    pub fn structure(message: impl Into<String>) -> Self {
        Self::new(StoryErrorKind::Structure(message.into()))
    }

    /// Shorthand for a [`StoryErrorKind::Validation`] error.
    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StoryErrorKind::Validation(message.into()))
    }
}
