//! Story generation and continuation.

use crate::{ContinuationContext, ModelInvoker, PromptBuilder};
use fabula_core::{GeneratedStory, StoryGenerationRequest, StoryGraph, StoryNode};
use fabula_error::{FabulaResult, StoryError, StoryErrorKind};
use tracing::{info, instrument};

/// A freshly generated story positioned at its opening scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStory {
    /// Title, setting, cast and opening scene
    pub story: GeneratedStory,
    /// Single-node graph at the opening scene
    pub graph: StoryGraph,
}

/// Result of one continuation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryStep {
    /// Graph with the new node inserted and made current
    pub graph: StoryGraph,
    /// The scene just generated
    pub node: StoryNode,
    /// Whether the new scene ends the story
    pub is_ending: bool,
}

/// Stateless orchestration of story generation and continuation.
///
/// The engine never holds story state between calls; callers pass the graph in
/// and receive the updated graph back. Graph mutation happens only after the
/// model's answer has been fully validated, so dropping a call part way through
/// leaves the caller's graph untouched.
#[derive(Debug, Clone)]
pub struct StoryEngine {
    invoker: ModelInvoker,
    prompts: PromptBuilder,
}

impl StoryEngine {
    /// Create an engine around an invoker.
    pub fn new(invoker: ModelInvoker) -> Self {
        Self {
            invoker,
            prompts: PromptBuilder,
        }
    }

    /// The invoker this engine calls.
    pub fn invoker(&self) -> &ModelInvoker {
        &self.invoker
    }

    /// Generate a new story from a premise.
    ///
    /// # Errors
    ///
    /// A blank premise is rejected before any model is contacted. Otherwise the
    /// invoker's errors are returned unchanged.
    #[instrument(skip(self, request), fields(genre = ?request.genre()))]
    pub async fn start_story(&self, request: &StoryGenerationRequest) -> FabulaResult<NewStory> {
        let prompt = self.prompts.generation(request)?;

        let story: GeneratedStory = self.invoker.invoke(&prompt).await?;
        let graph = StoryGraph::initialize(&story);

        info!(
            title = %story.title,
            first_node = %story.first_node.id,
            characters = story.characters.len(),
            "Generated new story"
        );

        Ok(NewStory { story, graph })
    }

    /// Generate the scene that follows `selected_choice_id` on the current node.
    ///
    /// Consumes the caller's graph and returns the advanced one.
    ///
    /// # Errors
    ///
    /// - not found if the graph's current node is missing
    /// - invalid choice if the current node ends the story or does not offer the choice
    ///
    /// Both are raised before any model is contacted.
    #[instrument(
        skip(self, graph, story),
        fields(current = %graph.current_node_id(), steps = graph.steps())
    )]
    pub async fn continue_story(
        &self,
        graph: StoryGraph,
        story: &GeneratedStory,
        selected_choice_id: &str,
    ) -> FabulaResult<StoryStep> {
        let current = graph.current_node().ok_or_else(|| {
            StoryError::new(StoryErrorKind::NotFound(format!(
                "current node '{}'",
                graph.current_node_id()
            )))
        })?;

        if current.is_ending {
            return Err(StoryError::new(StoryErrorKind::InvalidChoice(format!(
                "node '{}' ends the story",
                current.id
            )))
            .into());
        }

        let choice = current.find_choice(selected_choice_id).ok_or_else(|| {
            StoryError::new(StoryErrorKind::InvalidChoice(format!(
                "choice '{}' is not offered by node '{}'",
                selected_choice_id, current.id
            )))
        })?;
        let chosen_text = choice.text.clone();

        let prompt = self.prompts.continuation(&ContinuationContext {
            current_node: current,
            selected_choice_id,
            story,
            previous_choices: graph.previous_choices(),
        })?;

        let node: StoryNode = self.invoker.invoke(&prompt).await?;
        let is_ending = node.is_ending;
        let graph = graph.advance(node.clone(), chosen_text);

        info!(
            node = %node.id,
            is_ending,
            steps = graph.steps(),
            "Advanced story"
        );

        Ok(StoryStep {
            graph,
            node,
            is_ending,
        })
    }
}
