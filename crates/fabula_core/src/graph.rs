//! The append-only record of a playthrough.

use crate::{GeneratedStory, StoryNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every node generated for one story, the node being presented, and the text of
/// each choice taken so far.
///
/// Invariants maintained by [`StoryGraph::initialize`] and [`StoryGraph::advance`]:
/// - `current_node_id` keys an entry in `nodes`
/// - `nodes` only grows; inserting an existing id replaces that entry
/// - `previous_choices` gains exactly one entry per continuation step
///
/// A graph read back from storage is not re-checked on load; callers that need the
/// current node use [`StoryGraph::current_node`] and handle `None`.
///
/// # Examples
///
/// ```
/// use fabula_core::{GeneratedStory, StoryGraph, StoryNode};
///
/// let story = GeneratedStory {
///     title: "The Keeper".to_string(),
///     description: String::new(),
///     setting: "A storm-bound lighthouse".to_string(),
///     characters: vec![],
///     first_node: StoryNode {
///         id: "node_1".to_string(),
///         content: "The lamp has gone out.".to_string(),
///         choices: vec![],
///         is_ending: false,
///     },
/// };
///
/// let graph = StoryGraph::initialize(&story);
/// assert_eq!(graph.current_node_id(), "node_1");
/// assert_eq!(graph.len(), 1);
/// assert!(graph.previous_choices().is_empty());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(rename_all = "camelCase")]
pub struct StoryGraph {
    /// Generated nodes keyed by id
    nodes: BTreeMap<String, StoryNode>,
    /// Node currently presented to the player
    current_node_id: String,
    /// Text of each chosen option, oldest first
    #[serde(default)]
    previous_choices: Vec<String>,
}

impl StoryGraph {
    /// Create a single-node graph positioned at the story's opening scene.
    pub fn initialize(story: &GeneratedStory) -> Self {
        let first = story.first_node.clone();
        let current_node_id = first.id.clone();
        let mut nodes = BTreeMap::new();
        nodes.insert(current_node_id.clone(), first);

        Self {
            nodes,
            current_node_id,
            previous_choices: Vec::new(),
        }
    }

    /// Record one continuation step.
    ///
    /// Inserts `next_node` (replacing any node with the same id), moves the current
    /// pointer to it and appends `chosen_text` to the choice history. Consumes the
    /// caller's copy and returns the updated graph.
    pub fn advance(mut self, next_node: StoryNode, chosen_text: impl Into<String>) -> Self {
        self.current_node_id = next_node.id.clone();
        self.nodes.insert(next_node.id.clone(), next_node);
        self.previous_choices.push(chosen_text.into());
        self
    }

    /// The node currently presented, if the graph is consistent.
    pub fn current_node(&self) -> Option<&StoryNode> {
        self.nodes.get(&self.current_node_id)
    }

    /// Look up any generated node by id.
    pub fn node(&self, id: &str) -> Option<&StoryNode> {
        self.nodes.get(id)
    }

    /// Whether the current node ends the story.
    pub fn is_terminal(&self) -> bool {
        self.current_node().is_some_and(|node| node.is_ending)
    }

    /// Number of continuation steps taken.
    pub fn steps(&self) -> usize {
        self.previous_choices.len()
    }

    /// Number of generated nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes (only possible for a corrupt record).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
