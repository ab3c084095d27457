//! Prompt construction for story generation and continuation.

use fabula_core::{GeneratedStory, PromptPair, StoryGenerationRequest, StoryNode};
use fabula_error::{FabulaResult, StoryError};

const GENERATION_SYSTEM_PROMPT: &str = r#"You are an AI storyteller that creates interactive branching narratives.
Generate a story structure with multiple choice points and branching paths.
Return a JSON response with the following structure:
{
  "title": "Story title",
  "description": "Brief story description",
  "setting": "Story setting description",
  "characters": [{"name": "Character Name", "description": "Character description", "role": "protagonist/antagonist/supporting"}],
  "firstNode": {
    "id": "node_1",
    "content": "Opening story content (2-3 paragraphs)",
    "choices": [
      {"id": "choice_1", "text": "Choice text", "nextNodeId": "node_2"},
      {"id": "choice_2", "text": "Choice text", "nextNodeId": "node_3"}
    ],
    "isEnding": false
  }
}

Create engaging, immersive content appropriate for the given genre and style."#;

const CONTINUATION_SYSTEM_PROMPT: &str = r#"You are continuing an interactive branching story. Based on the context and the player's choice,
generate the next story node. Return a JSON response with this structure:
{
  "id": "unique_node_id",
  "content": "Story content for this scene (2-3 paragraphs)",
  "choices": [
    {"id": "choice_id", "text": "Choice text", "nextNodeId": "next_node_id"}
  ],
  "isEnding": false
}
Set "isEnding" to true if this scene concludes the story.

Make choices meaningful and continue the narrative coherently."#;

const JSON_ONLY: &str = "Please respond with valid JSON only, no additional text.";

/// Everything the continuation prompt needs to know about the playthrough.
#[derive(Debug, Clone, Copy)]
pub struct ContinuationContext<'a> {
    /// Scene the player is leaving
    pub current_node: &'a StoryNode,
    /// Id of the option the player picked on `current_node`
    pub selected_choice_id: &'a str,
    /// Title, setting and cast
    pub story: &'a GeneratedStory,
    /// Text of each earlier choice, oldest first
    pub previous_choices: &'a [String],
}

/// Builds system/user prompt pairs. Pure; performs no I/O.
///
/// # Examples
///
/// ```
/// use fabula_core::StoryGenerationRequest;
/// use fabula_narrative::PromptBuilder;
///
/// let request = StoryGenerationRequest::builder()
///     .premise("A lighthouse keeper finds a door in the sea")
///     .genre("mystery")
///     .build()
///     .unwrap();
///
/// let prompt = PromptBuilder.generation(&request).unwrap();
/// assert!(prompt.user.contains("\"A lighthouse keeper finds a door in the sea\""));
/// assert!(prompt.user.contains("Genre: mystery"));
/// assert!(!prompt.user.contains("Style:"));
///
/// let blank = StoryGenerationRequest::new("   ");
/// assert!(PromptBuilder.generation(&blank).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    /// Prompt pair for creating a new story from a premise.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the premise is empty or blank.
    pub fn generation(&self, request: &StoryGenerationRequest) -> FabulaResult<PromptPair> {
        let premise = request.premise().trim();
        if premise.is_empty() {
            return Err(StoryError::validation("premise is required").into());
        }

        let mut lines = vec![format!(
            "Create an interactive story based on this premise: \"{}\"",
            premise
        )];
        if let Some(genre) = request.genre() {
            lines.push(format!("Genre: {}", genre));
        }
        if let Some(style) = request.style() {
            lines.push(format!("Style: {}", style));
        }
        if !request.constraints().is_empty() {
            lines.push(format!("Constraints: {}", request.constraints().join(", ")));
        }
        lines.push(String::new());
        lines.push(
            "Make the story engaging with clear character motivations and meaningful choices \
             that affect the narrative direction."
                .to_string(),
        );
        lines.push(String::new());
        lines.push(JSON_ONLY.to_string());

        Ok(PromptPair::new(GENERATION_SYSTEM_PROMPT, lines.join("\n")))
    }

    /// Prompt pair for generating the scene that follows the player's choice.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the selected choice is not offered by the
    /// current node or has no text.
    pub fn continuation(&self, context: &ContinuationContext<'_>) -> FabulaResult<PromptPair> {
        let choice = context
            .current_node
            .find_choice(context.selected_choice_id)
            .ok_or_else(|| {
                StoryError::validation(format!(
                    "choice '{}' is not offered by node '{}'",
                    context.selected_choice_id, context.current_node.id
                ))
            })?;
        if choice.text.trim().is_empty() {
            return Err(StoryError::validation(format!("choice '{}' has no text", choice.id)).into());
        }

        let characters = context
            .story
            .characters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        let user = [
            format!("Continue the story \"{}\".", context.story.title),
            String::new(),
            format!("Current scene: {}", context.current_node.content),
            format!("Player chose: \"{}\"", choice.text),
            String::new(),
            "Previous story context:".to_string(),
            format!("- Setting: {}", context.story.setting),
            format!("- Characters: {}", characters),
            format!("- Previous choices: {}", context.previous_choices.join(" -> ")),
            String::new(),
            "Generate the next scene based on the player's choice, maintaining story \
             continuity and character consistency."
                .to_string(),
            String::new(),
            JSON_ONLY.to_string(),
        ]
        .join("\n");

        Ok(PromptPair::new(CONTINUATION_SYSTEM_PROMPT, user))
    }
}
