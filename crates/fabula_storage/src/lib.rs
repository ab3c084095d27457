//! Story record storage for Fabula.
//!
//! Two [`fabula_interface::StoryRepository`] implementations:
//! - [`InMemoryStoryRepository`] - a `HashMap` behind an async lock, for tests
//!   and one-shot runs
//! - [`FileSystemStoryRepository`] - one JSON file per story, written atomically

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod memory;

pub use filesystem::FileSystemStoryRepository;
pub use memory::InMemoryStoryRepository;
