//! Validation of raw model output.
//!
//! Model output is an untrusted wire format. Everything the engine accepts passes
//! through [`validate_response`]: fence stripping, JSON parsing and a schema check.
//! No repair or coercion happens beyond removing the fences.

use fabula_core::{Choice, GeneratedStory, StoryNode};
use fabula_error::StoryError;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Characters of offending output included in logs.
const PREVIEW_CHARS: usize = 100;

/// A payload the engine can request from a model.
pub trait StoryPayload: Sized + Send {
    /// Human-readable name used in errors and logs.
    const KIND: &'static str;

    /// Shape the model's JSON is parsed into before the schema check.
    type Wire: DeserializeOwned;

    /// Check required fields and build the payload, describing the first problem found.
    fn from_wire(wire: Self::Wire) -> Result<Self, String>;
}

impl StoryPayload for GeneratedStory {
    const KIND: &'static str = "story";
    type Wire = GeneratedStory;

    fn from_wire(story: GeneratedStory) -> Result<Self, String> {
        if story.title.trim().is_empty() {
            return Err("missing title".to_string());
        }
        if story.first_node.id.trim().is_empty() {
            return Err("missing firstNode.id".to_string());
        }
        if story.first_node.content.trim().is_empty() {
            return Err("missing firstNode.content".to_string());
        }
        Ok(story)
    }
}

/// A continuation scene as the model sent it.
///
/// Unlike [`StoryNode`], `choices` has no default: an absent or null list is a
/// structure error, while an empty one is accepted on endings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuationWire {
    id: String,
    content: String,
    choices: Option<Vec<Choice>>,
    #[serde(default)]
    is_ending: bool,
}

impl StoryPayload for StoryNode {
    const KIND: &'static str = "story continuation";
    type Wire = ContinuationWire;

    fn from_wire(wire: ContinuationWire) -> Result<Self, String> {
        if wire.id.trim().is_empty() {
            return Err("missing id".to_string());
        }
        if wire.content.trim().is_empty() {
            return Err("missing content".to_string());
        }
        let Some(choices) = wire.choices else {
            return Err("missing choices".to_string());
        };
        if choices.is_empty() && !wire.is_ending {
            return Err("no choices on a node that does not end the story".to_string());
        }
        Ok(StoryNode {
            id: wire.id,
            content: wire.content,
            choices,
            is_ending: wire.is_ending,
        })
    }
}

/// Remove markdown code fences (```` ```json ```` or bare ```` ``` ````) and trim.
///
/// # Examples
///
/// ```
/// use fabula_narrative::strip_fences;
///
/// assert_eq!(strip_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_fences("  {\"a\": 1}  "), "{\"a\": 1}");
/// ```
pub fn strip_fences(text: &str) -> String {
    text.replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Turn raw model text into a validated payload.
///
/// # Errors
///
/// Returns a structure error if the text is not JSON, does not match the payload
/// shape, or is missing a required field. The raw text is logged as a bounded
/// preview and never included in the error.
pub fn validate_response<T: StoryPayload>(text: &str) -> Result<T, StoryError> {
    let json = strip_fences(text);

    let wire: T::Wire = serde_json::from_str(&json).map_err(|e| {
        tracing::error!(
            kind = T::KIND,
            error = %e,
            response_length = json.len(),
            preview = %preview(&json),
            "Failed to parse model response"
        );
        StoryError::structure(format!(
            "{} response is not valid JSON ({:?} error at line {} column {})",
            T::KIND,
            e.classify(),
            e.line(),
            e.column()
        ))
    })?;

    let payload = T::from_wire(wire).map_err(|problem| {
        tracing::error!(
            kind = T::KIND,
            problem = %problem,
            preview = %preview(&json),
            "Model response failed schema check"
        );
        StoryError::structure(format!("invalid {} structure: {}", T::KIND, problem))
    })?;

    Ok(payload)
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
