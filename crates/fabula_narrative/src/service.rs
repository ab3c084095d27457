//! Caller-facing story operations backed by a repository.

use crate::StoryEngine;
use fabula_core::{
    GeneratedStory, StoryGenerationRequest, StoryGraph, StoryId, StoryNode, StoryRecord,
    StorySummary,
};
use fabula_error::{FabulaResult, StorageErrorKind, StoryError, StoryErrorKind};
use fabula_interface::StoryRepository;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// A stored story, ready to play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedStory {
    /// Store key for later continuations
    pub id: StoryId,
    /// Title, setting, cast and opening scene
    pub story: GeneratedStory,
    /// Playthrough state
    pub graph: StoryGraph,
}

/// The scene reached by a stored continuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuedStory {
    /// Newly generated scene
    pub next_node: StoryNode,
    /// Whether the story has ended
    pub is_ending: bool,
}

/// Runs the engine against persisted stories.
///
/// Each call loads what it needs, runs one engine operation and writes the
/// result back; nothing is cached between calls.
#[derive(Clone)]
pub struct StoryService {
    engine: StoryEngine,
    repository: Arc<dyn StoryRepository>,
}

impl std::fmt::Debug for StoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryService")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl StoryService {
    /// Create a service from an engine and a store.
    pub fn new(engine: StoryEngine, repository: Arc<dyn StoryRepository>) -> Self {
        Self { engine, repository }
    }

    /// Generate a story and store it.
    #[instrument(skip(self, request))]
    pub async fn start_story(&self, request: &StoryGenerationRequest) -> FabulaResult<StartedStory> {
        let generated = self.engine.start_story(request).await?;

        let record = StoryRecord::new(
            generated.story.clone(),
            generated.graph.clone(),
            request.genre().clone(),
        );
        self.repository.insert(&record).await?;

        info!(story_id = %record.id, "Stored new story");

        Ok(StartedStory {
            id: record.id,
            story: generated.story,
            graph: generated.graph,
        })
    }

    /// Continue a stored story from `current_node_id` with the selected choice.
    ///
    /// # Errors
    ///
    /// - validation error if any id is blank, or if `current_node_id` exists but
    ///   is no longer the story's current node
    /// - not found if the story or `current_node_id` is unknown
    /// - invalid choice if the choice is not offered or the story has ended
    #[instrument(skip(self))]
    pub async fn continue_story(
        &self,
        story_id: &str,
        current_node_id: &str,
        selected_choice_id: &str,
    ) -> FabulaResult<ContinuedStory> {
        for (name, value) in [
            ("story id", story_id),
            ("current node id", current_node_id),
            ("choice id", selected_choice_id),
        ] {
            if value.trim().is_empty() {
                return Err(StoryError::validation(format!("{} is required", name)).into());
            }
        }

        let id: StoryId = story_id.parse()?;
        let record = self.load_story(&id).await?;

        if record.graph.node(current_node_id).is_none() {
            return Err(StoryError::new(StoryErrorKind::NotFound(format!(
                "node '{}' in story {}",
                current_node_id, id
            )))
            .into());
        }
        if record.graph.current_node_id() != current_node_id {
            return Err(StoryError::new(StoryErrorKind::StaleNode {
                requested: current_node_id.to_string(),
                current: record.graph.current_node_id().clone(),
            })
            .into());
        }

        let step = self
            .engine
            .continue_story(record.graph, &record.story, selected_choice_id)
            .await?;

        self.repository
            .save(&id, &step.graph, step.is_ending)
            .await?;

        info!(story_id = %id, node = %step.node.id, is_ending = step.is_ending, "Saved continuation");

        Ok(ContinuedStory {
            next_node: step.node,
            is_ending: step.is_ending,
        })
    }

    /// Load a stored story.
    ///
    /// A missing story is reported as a not-found story error.
    #[instrument(skip(self))]
    pub async fn load_story(&self, id: &StoryId) -> FabulaResult<StoryRecord> {
        match self.repository.load(id).await {
            Ok(record) => Ok(record),
            Err(err) => match err.kind() {
                fabula_error::FabulaErrorKind::Storage(storage)
                    if matches!(storage.kind, StorageErrorKind::NotFound(_)) =>
                {
                    Err(StoryError::new(StoryErrorKind::NotFound(format!("story {}", id))).into())
                }
                _ => Err(err),
            },
        }
    }

    /// Summaries of every stored story.
    pub async fn list_stories(&self) -> FabulaResult<Vec<StorySummary>> {
        self.repository.list().await
    }
}
