//! Repository trait for story persistence.

use async_trait::async_trait;
use fabula_core::{StoryGraph, StoryId, StoryRecord, StorySummary};
use fabula_error::FabulaResult;

/// Persistent store for story records.
///
/// Implementations must round-trip a [`StoryGraph`] losslessly, including the
/// order of its choice history.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Persist a newly created story.
    ///
    /// Fails with `StorageErrorKind::AlreadyExists` if the id is taken.
    async fn insert(&self, record: &StoryRecord) -> FabulaResult<()>;

    /// Load a story by id.
    ///
    /// Fails with `StorageErrorKind::NotFound` if no such story exists.
    async fn load(&self, id: &StoryId) -> FabulaResult<StoryRecord>;

    /// Replace the graph of an existing story and update its completion flag.
    async fn save(&self, id: &StoryId, graph: &StoryGraph, completed: bool) -> FabulaResult<()>;

    /// Summaries of every stored story, most recently updated first.
    async fn list(&self) -> FabulaResult<Vec<StorySummary>>;
}
