//! Story generation and continuation engine for Fabula.
//!
//! The engine turns a premise or a player's choice into a prompt, asks an ordered
//! list of models for an answer, validates that answer against the story schema
//! and records the result in a [`fabula_core::StoryGraph`].
//!
//! # Components
//!
//! - [`PromptBuilder`] builds system/user prompt pairs
//! - [`validate_response`] strips fences, parses and schema-checks model output
//! - [`ModelInvoker`] walks the model fallback list and retries transient failures
//! - [`StoryEngine`] starts and continues stories without holding state
//! - [`StoryService`] runs the engine against a [`fabula_interface::StoryRepository`]
//!
//! # Example
//!
//! ```no_run
//! use fabula_core::StoryGenerationRequest;
//! use fabula_narrative::{FabulaConfig, ModelInvoker, StoryEngine};
//! # use std::sync::Arc;
//! # async fn run(driver: Arc<dyn fabula_interface::StoryDriver>) -> fabula_error::FabulaResult<()> {
//! let config = FabulaConfig::load()?;
//! let engine = StoryEngine::new(ModelInvoker::new(driver, &config)?);
//!
//! let new_story = engine
//!     .start_story(&StoryGenerationRequest::new("A door in the sea"))
//!     .await?;
//! println!("{}", new_story.story.title);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod invoker;
mod prompt;
mod service;
mod validation;

pub use config::{FabulaConfig, GenerationConfig, RetryConfig, StorageConfig};
pub use engine::{NewStory, StoryEngine, StoryStep};
pub use invoker::{BackoffSchedule, ModelInvoker};
pub use prompt::{ContinuationContext, PromptBuilder};
pub use service::{ContinuedStory, StartedStory, StoryService};
pub use validation::{ContinuationWire, StoryPayload, strip_fences, validate_response};
