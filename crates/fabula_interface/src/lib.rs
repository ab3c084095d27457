//! Trait definitions for the Fabula branching narrative engine.
//!
//! The engine talks to two external collaborators: a generative service that
//! turns prompts into text ([`StoryDriver`]) and a persistent store that keeps
//! story state between requests ([`StoryRepository`]). Both are injected as
//! trait objects so tests can substitute doubles.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod repository;
mod traits;

pub use repository::StoryRepository;
pub use traits::StoryDriver;
