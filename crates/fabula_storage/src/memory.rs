//! In-memory implementation of StoryRepository.

use async_trait::async_trait;
use fabula_core::{StoryGraph, StoryId, StoryRecord, StorySummary};
use fabula_error::{FabulaResult, StorageError, StorageErrorKind};
use fabula_interface::StoryRepository;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory repository for story records.
///
/// Stores records in a HashMap protected by an RwLock for thread-safe access.
/// All data is lost when the repository is dropped.
///
/// # Example
/// ```
/// use fabula_storage::InMemoryStoryRepository;
///
/// # #[tokio::main]
/// # async fn main() {
/// let repo = InMemoryStoryRepository::new();
/// assert!(repo.is_empty().await);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoryRepository {
    records: Arc<RwLock<HashMap<StoryId, StoryRecord>>>,
}

impl InMemoryStoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored stories.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Check if the repository is empty.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Remove every story.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    async fn insert(&self, record: &StoryRecord) -> FabulaResult<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(
                StorageError::new(StorageErrorKind::AlreadyExists(record.id.to_string())).into(),
            );
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, id: &StoryId) -> FabulaResult<StoryRecord> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(id.to_string())).into())
    }

    async fn save(&self, id: &StoryId, graph: &StoryGraph, completed: bool) -> FabulaResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(id.to_string())))?;
        record.record_step(graph.clone(), completed);
        Ok(())
    }

    async fn list(&self) -> FabulaResult<Vec<StorySummary>> {
        let mut summaries: Vec<StorySummary> = self
            .records
            .read()
            .await
            .values()
            .map(StoryRecord::summary)
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_core::{GeneratedStory, StoryNode};

    fn record() -> StoryRecord {
        let story = GeneratedStory {
            title: "The Keeper".to_string(),
            description: String::new(),
            setting: String::new(),
            characters: vec![],
            first_node: StoryNode {
                id: "node_1".to_string(),
                content: "Dark.".to_string(),
                choices: vec![],
                is_ending: false,
            },
        };
        let graph = StoryGraph::initialize(&story);
        StoryRecord::new(story, graph, None)
    }

    #[tokio::test]
    async fn test_insert_twice_is_rejected() {
        let repo = InMemoryStoryRepository::new();
        let record = record();

        repo.insert(&record).await.unwrap();
        let err = repo.insert(&record).await.unwrap_err();

        assert!(err.to_string().contains("already exists"));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_unknown_story_is_not_found() {
        let repo = InMemoryStoryRepository::new();
        let record = record();

        let err = repo.save(&record.id, &record.graph, false).await.unwrap_err();
        assert_eq!(err.category(), fabula_error::ErrorCategory::NotFound);
    }
}
