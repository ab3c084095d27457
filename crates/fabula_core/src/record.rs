//! Persisted story records.

use crate::{GeneratedStory, StoryGraph};
use chrono::{DateTime, Utc};
use fabula_error::{StoryError, StoryErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a stored story.
///
/// # Examples
///
/// ```
/// use fabula_core::StoryId;
///
/// let id = StoryId::new();
/// let parsed: StoryId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// assert!("not-a-uuid".parse::<StoryId>().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct StoryId(Uuid);

impl StoryId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::str::FromStr for StoryId {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self).map_err(|e| {
            StoryError::new(StoryErrorKind::Validation(format!(
                "invalid story id '{}': {}",
                s, e
            )))
        })
    }
}

/// Everything persisted for one story between requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRecord {
    /// Store key
    pub id: StoryId,
    /// Generated title, setting and cast
    pub story: GeneratedStory,
    /// Playthrough state
    pub graph: StoryGraph,
    /// Genre requested at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Set once an ending node has been reached
    #[serde(default)]
    pub completed: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Time of the last saved step
    pub updated_at: DateTime<Utc>,
}

impl StoryRecord {
    /// Create a fresh record for a newly generated story.
    pub fn new(story: GeneratedStory, graph: StoryGraph, genre: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: StoryId::new(),
            completed: graph.is_terminal(),
            story,
            graph,
            genre,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the graph after a continuation step.
    pub fn record_step(&mut self, graph: StoryGraph, completed: bool) {
        self.graph = graph;
        self.completed = completed;
        self.updated_at = Utc::now();
    }

    /// Lightweight listing view.
    pub fn summary(&self) -> StorySummary {
        StorySummary {
            id: self.id,
            title: self.story.title.clone(),
            genre: self.genre.clone(),
            steps: self.graph.steps(),
            completed: self.completed,
            updated_at: self.updated_at,
        }
    }
}

/// Summary of a stored story, without its nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorySummary {
    /// Store key
    pub id: StoryId,
    /// Story title
    pub title: String,
    /// Genre requested at creation
    pub genre: Option<String>,
    /// Continuation steps taken
    pub steps: usize,
    /// Whether an ending was reached
    pub completed: bool,
    /// Time of the last saved step
    pub updated_at: DateTime<Utc>,
}
