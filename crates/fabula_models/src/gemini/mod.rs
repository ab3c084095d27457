//! Google Gemini API client implementation.
//!
//! The REST client supports per-request model selection with a lazily built
//! client per model, shared safely across tasks.

mod client;

pub use client::GeminiClient;

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, fabula_error::ServiceError>;
