//! Error types for the Fabula library.
//!
//! This crate provides the foundation error types used throughout the Fabula workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Every error can be reduced to an [`ErrorCategory`], the coarse taxonomy that
//! callers of the engine are allowed to see.
//!
//! # Examples
//!
//! ```
//! use fabula_error::{ErrorCategory, FabulaResult, StoryError, StoryErrorKind};
//!
//! fn pick() -> FabulaResult<()> {
//!     Err(StoryError::new(StoryErrorKind::InvalidChoice("choice_9".to_string())))?
//! }
//!
//! let err = pick().unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::InvalidChoice);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod category;
mod config;
mod error;
mod json;
mod service;
mod storage;
mod story;

pub use category::ErrorCategory;
pub use config::ConfigError;
pub use error::{FabulaError, FabulaErrorKind, FabulaResult};
pub use json::JsonError;
pub use service::{RetryableError, ServiceError, ServiceErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use story::{StoryError, StoryErrorKind};
