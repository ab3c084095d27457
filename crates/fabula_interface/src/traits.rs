//! Trait definitions for generative service backends.

use async_trait::async_trait;
use fabula_core::{GenerateRequest, GenerateResponse};
use fabula_error::FabulaResult;

/// Core trait that all generative service backends must implement.
///
/// One driver serves every model in the fallback list; the model to use is
/// carried by [`GenerateRequest::model`]. Errors that carry an HTTP status
/// should surface as `ServiceErrorKind::HttpError` so the invoker can tell
/// transient failures from permanent ones.
#[async_trait]
pub trait StoryDriver: Send + Sync {
    /// Send the prompt pair in `req` to the model it names and return the raw text.
    async fn generate(&self, req: &GenerateRequest) -> FabulaResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;
}
