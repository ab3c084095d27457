//! Core data types for the Fabula branching narrative engine.
//!
//! This crate provides the story model shared by every Fabula crate: the nodes and
//! choices a model generates, the story graph that records a playthrough, and the
//! request/response types exchanged with a generative service.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod graph;
mod message;
mod record;
mod request;
mod role;
mod story;
mod telemetry;

pub use graph::StoryGraph;
pub use message::{Message, PromptPair};
pub use record::{StoryId, StoryRecord, StorySummary};
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateRequestBuilderError, GenerateResponse,
    StoryGenerationRequest, StoryGenerationRequestBuilder, StoryGenerationRequestBuilderError,
};
pub use role::Role;
pub use story::{Character, Choice, GeneratedStory, StoryNode};
pub use telemetry::{init_telemetry, shutdown_telemetry};
