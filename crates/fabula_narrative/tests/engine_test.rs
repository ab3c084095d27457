//! Story generation and continuation through the engine.

mod test_utils;

use fabula_core::{StoryGenerationRequest, StoryGraph};
use fabula_error::ErrorCategory;
use fabula_narrative::{ModelInvoker, NewStory, StoryEngine};
use std::sync::Arc;
use test_utils::*;

fn engine(driver: &Arc<MockDriver>) -> StoryEngine {
    StoryEngine::new(ModelInvoker::new(driver.clone(), &two_model_config()).unwrap())
}

async fn started(driver: &Arc<MockDriver>) -> NewStory {
    engine(driver)
        .start_story(&StoryGenerationRequest::new("A door in the sea"))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_start_story_builds_single_node_graph() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new().always_text(FLASH, story_json()));

    let request = StoryGenerationRequest::builder()
        .premise("A door in the sea")
        .genre("mystery")
        .build()?;
    let new_story = engine(&driver).start_story(&request).await?;

    assert_eq!(new_story.graph.len(), 1);
    assert_eq!(new_story.graph.current_node_id(), &new_story.story.first_node.id);
    assert!(new_story.graph.previous_choices().is_empty());
    assert_eq!(new_story.story.characters[0].name, "Mara");

    let user = driver.calls()[0].request.user_prompt().unwrap_or_default().to_string();
    assert!(user.contains("Genre: mystery"));
    Ok(())
}

#[tokio::test]
async fn test_blank_premise_never_reaches_a_model() {
    let driver = Arc::new(MockDriver::new().always_text(FLASH, story_json()));

    let err = engine(&driver)
        .start_story(&StoryGenerationRequest::new("  \n"))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_continue_advances_graph() -> anyhow::Result<()> {
    let driver = Arc::new(
        MockDriver::new().script(
            FLASH,
            vec![
                MockResponse::Text(story_json()),
                MockResponse::Text(node_json("node_2", false)),
            ],
        ),
    );
    let new_story = started(&driver).await;

    let step = engine(&driver)
        .continue_story(new_story.graph, &new_story.story, "choice_1")
        .await?;

    assert_eq!(step.node.id, "node_2");
    assert!(!step.is_ending);
    assert_eq!(step.graph.len(), 2);
    assert_eq!(step.graph.current_node_id(), "node_2");
    assert_eq!(step.graph.previous_choices(), &vec!["Climb the stairs".to_string()]);

    let user = driver.calls()[1].request.user_prompt().unwrap_or_default().to_string();
    assert!(user.contains("Player chose: \"Climb the stairs\""));
    assert!(user.contains("- Characters: Mara (protagonist): The last keeper"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_choice_is_rejected_without_model_call() {
    let driver = Arc::new(MockDriver::new().always_text(FLASH, story_json()));
    let new_story = started(&driver).await;
    let calls_before = driver.call_count();

    let err = engine(&driver)
        .continue_story(new_story.graph, &new_story.story, "choice_9")
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::InvalidChoice);
    assert_eq!(driver.call_count(), calls_before);
}

#[tokio::test]
async fn test_ending_node_cannot_be_continued() -> anyhow::Result<()> {
    let driver = Arc::new(
        MockDriver::new().script(
            FLASH,
            vec![
                MockResponse::Text(story_json()),
                MockResponse::Text(node_json("node_end", true)),
            ],
        ),
    );
    let new_story = started(&driver).await;
    let engine = engine(&driver);

    let step = engine
        .continue_story(new_story.graph, &new_story.story, "choice_1")
        .await?;
    assert!(step.is_ending);
    assert!(step.graph.is_terminal());
    let calls_before = driver.call_count();

    let err = engine
        .continue_story(step.graph, &new_story.story, "node_end_a")
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::InvalidChoice);
    assert_eq!(driver.call_count(), calls_before);
    Ok(())
}

#[tokio::test]
async fn test_missing_current_node_is_not_found() -> anyhow::Result<()> {
    let driver = Arc::new(MockDriver::new().always_text(FLASH, story_json()));
    let new_story = started(&driver).await;

    let broken: StoryGraph = serde_json::from_value(serde_json::json!({
        "nodes": {},
        "currentNodeId": "node_1",
        "previousChoices": []
    }))?;

    let err = engine(&driver)
        .continue_story(broken, &new_story.story, "choice_1")
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::NotFound);
    Ok(())
}

#[tokio::test]
async fn test_invalid_continuation_surfaces_structure_error() -> anyhow::Result<()> {
    let driver = Arc::new(
        MockDriver::new()
            .script(FLASH, vec![MockResponse::Text(story_json()), garbage()])
            .always(PRO, garbage()),
    );
    let new_story = started(&driver).await;

    let err = engine(&driver)
        .continue_story(new_story.graph, &new_story.story, "choice_2")
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Structure);
    assert_eq!(driver.models_called(), vec![FLASH, FLASH, PRO]);
    Ok(())
}
