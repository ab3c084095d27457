//! Generated story content: nodes, choices and characters.

use serde::{Deserialize, Serialize};

/// One selectable option leading out of a [`StoryNode`].
///
/// `next_node_id` is the model's declared intention for where the option leads.
/// The node actually generated for this branch may carry a different id, so the
/// field is informational only.
///
/// # Examples
///
/// ```
/// use fabula_core::Choice;
///
/// let choice: Choice = serde_json::from_str(
///     r#"{"id": "choice_1", "text": "Open the door", "nextNodeId": "node_2"}"#,
/// ).unwrap();
/// assert_eq!(choice.text, "Open the door");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Identifier, unique within the owning node
    pub id: String,
    /// Text presented to the player
    pub text: String,
    /// Node the model claims this choice leads to (not authoritative)
    #[serde(default)]
    pub next_node_id: String,
}

/// A single generated scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryNode {
    /// Identifier, unique within the owning story graph
    pub id: String,
    /// Scene prose
    pub content: String,
    /// Outgoing options, in presentation order
    ///
    /// May be omitted on an opening scene. Continuation output must carry it.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Whether this scene concludes the story
    #[serde(default)]
    pub is_ending: bool,
}

impl StoryNode {
    /// Choices the player may actually select.
    ///
    /// Ending nodes offer nothing, whatever the model put in `choices`.
    pub fn selectable_choices(&self) -> &[Choice] {
        if self.is_ending { &[] } else { self.choices.as_slice() }
    }

    /// Look up a selectable choice by id.
    pub fn find_choice(&self, choice_id: &str) -> Option<&Choice> {
        self.selectable_choices().iter().find(|c| c.id == choice_id)
    }
}

/// A character introduced when the story was generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Character {
    /// Character name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Narrative role, e.g. protagonist, antagonist or supporting
    #[serde(default)]
    pub role: String,
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.role, self.description)
    }
}

/// The payload returned by the model when a new story is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedStory {
    /// Story title
    pub title: String,
    /// Brief description
    #[serde(default)]
    pub description: String,
    /// Setting description
    #[serde(default)]
    pub setting: String,
    /// Cast of characters
    #[serde(default)]
    pub characters: Vec<Character>,
    /// Opening scene
    pub first_node: StoryNode,
}
