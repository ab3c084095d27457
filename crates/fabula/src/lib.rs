//! Fabula - branching interactive fiction from language models
//!
//! Fabula asks a generative model for a story opening, then for one new scene each
//! time the player picks a choice. Every answer is schema-checked before it is
//! accepted; a failing model falls back to the next one in the configured list,
//! and transient service errors retry the whole list with exponential backoff.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fabula::{
//!     FabulaConfig, FileSystemStoryRepository, GeminiClient, ModelInvoker, StoryEngine,
//!     StoryGenerationRequest, StoryService,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FabulaConfig::load()?;
//!     let invoker = ModelInvoker::new(Arc::new(GeminiClient::new()?), &config)?;
//!     let repository = FileSystemStoryRepository::new(config.storage.resolved_path())?;
//!     let service = StoryService::new(StoryEngine::new(invoker), Arc::new(repository));
//!
//!     let started = service
//!         .start_story(&StoryGenerationRequest::new("A lighthouse keeper finds a door in the sea"))
//!         .await?;
//!     println!("{}", started.story.first_node.content);
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `gemini` (default) - Google Gemini driver and the `fabula` binary
//! - `api` - run tests that call the real Gemini API
//!
//! # Architecture
//!
//! - `fabula_core` - story data model, story graph, request/response types
//! - `fabula_error` - error types and the caller-facing error taxonomy
//! - `fabula_interface` - `StoryDriver` and `StoryRepository` traits
//! - `fabula_models` - provider drivers
//! - `fabula_narrative` - prompts, validation, model invocation, orchestration
//! - `fabula_storage` - in-memory and filesystem story repositories
//!
//! This crate (`fabula`) re-exports everything for convenience.

pub use fabula_core::*;
pub use fabula_error::*;
pub use fabula_interface::*;
pub use fabula_narrative::*;
pub use fabula_storage::*;

#[cfg(feature = "gemini")]
pub use fabula_models::*;
