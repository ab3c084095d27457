//! Stored-story operations through the service.

mod test_utils;

use fabula_core::{StoryGenerationRequest, StoryId};
use fabula_error::{ErrorCategory, StoryErrorKind};
use fabula_interface::StoryRepository;
use fabula_narrative::{ModelInvoker, StartedStory, StoryEngine, StoryService};
use fabula_storage::InMemoryStoryRepository;
use std::sync::Arc;
use test_utils::*;

struct Harness {
    driver: Arc<MockDriver>,
    repository: Arc<InMemoryStoryRepository>,
    service: StoryService,
}

fn harness(driver: MockDriver) -> Harness {
    let driver = Arc::new(driver);
    let repository = Arc::new(InMemoryStoryRepository::new());
    let invoker = ModelInvoker::new(driver.clone(), &two_model_config()).unwrap();
    let service = StoryService::new(StoryEngine::new(invoker), repository.clone());
    Harness {
        driver,
        repository,
        service,
    }
}

fn scripted(continuations: Vec<String>) -> MockDriver {
    let mut responses = vec![MockResponse::Text(story_json())];
    responses.extend(continuations.into_iter().map(MockResponse::Text));
    MockDriver::new().script(FLASH, responses)
}

async fn start(h: &Harness) -> StartedStory {
    let request = StoryGenerationRequest::builder()
        .premise("A door in the sea")
        .genre("mystery")
        .build()
        .unwrap();
    h.service.start_story(&request).await.unwrap()
}

#[tokio::test]
async fn test_start_story_is_stored() -> anyhow::Result<()> {
    let h = harness(scripted(vec![]));
    let started = start(&h).await;

    let record = h.repository.load(&started.id).await?;
    assert_eq!(record.story, started.story);
    assert_eq!(record.graph, started.graph);
    assert_eq!(record.genre.as_deref(), Some("mystery"));
    assert!(!record.completed);
    assert_eq!(h.repository.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_continue_saves_graph_until_ending() -> anyhow::Result<()> {
    let h = harness(scripted(vec![
        node_json("node_2", false),
        node_json("node_end", true),
    ]));
    let started = start(&h).await;
    let id = started.id.to_string();

    let first = h.service.continue_story(&id, "node_1", "choice_2").await?;
    assert_eq!(first.next_node.id, "node_2");
    assert!(!first.is_ending);

    let record = h.repository.load(&started.id).await?;
    assert_eq!(record.graph.current_node_id(), "node_2");
    assert_eq!(record.graph.previous_choices(), &vec!["Check the radio".to_string()]);
    assert!(!record.completed);

    let last = h.service.continue_story(&id, "node_2", "node_2_a").await?;
    assert!(last.is_ending);
    assert!(last.next_node.choices.is_empty());

    let record = h.repository.load(&started.id).await?;
    assert!(record.completed);
    assert_eq!(record.graph.len(), 3);
    assert_eq!(
        record.graph.previous_choices(),
        &vec!["Check the radio".to_string(), "Keep going".to_string()]
    );

    // The finished story accepts no further choices
    let err = h
        .service
        .continue_story(&id, "node_end", "anything")
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::InvalidChoice);
    assert_eq!(h.driver.call_count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_blank_ids_are_validation_errors() {
    let h = harness(scripted(vec![]));
    let started = start(&h).await;
    let id = started.id.to_string();

    for (story, node, choice) in [
        ("", "node_1", "choice_1"),
        (id.as_str(), " ", "choice_1"),
        (id.as_str(), "node_1", ""),
    ] {
        let err = h.service.continue_story(story, node, choice).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    let err = h
        .service
        .continue_story("not-a-uuid", "node_1", "choice_1")
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(h.driver.call_count(), 1);
}

#[tokio::test]
async fn test_unknown_story_and_node_are_not_found() {
    let h = harness(scripted(vec![]));
    let started = start(&h).await;

    let err = h
        .service
        .continue_story(&StoryId::new().to_string(), "node_1", "choice_1")
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert!(matches!(
        err.as_story().map(|e| &e.kind),
        Some(StoryErrorKind::NotFound(_))
    ));

    let err = h
        .service
        .continue_story(&started.id.to_string(), "node_99", "choice_1")
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert_eq!(h.driver.call_count(), 1);
}

#[tokio::test]
async fn test_stale_node_is_rejected() -> anyhow::Result<()> {
    let h = harness(scripted(vec![node_json("node_2", false)]));
    let started = start(&h).await;
    let id = started.id.to_string();

    h.service.continue_story(&id, "node_1", "choice_1").await?;

    // A second client still looking at the opening scene
    let err = h
        .service
        .continue_story(&id, "node_1", "choice_2")
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert!(matches!(
        err.as_story().map(|e| &e.kind),
        Some(StoryErrorKind::StaleNode { .. })
    ));

    let record = h.repository.load(&started.id).await?;
    assert_eq!(record.graph.steps(), 1);
    assert_eq!(h.driver.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_unknown_choice_never_reaches_a_model() -> anyhow::Result<()> {
    let h = harness(scripted(vec![node_json("node_2", false)]));
    let started = start(&h).await;

    let err = h
        .service
        .continue_story(&started.id.to_string(), "node_1", "choice_7")
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::InvalidChoice);
    assert_eq!(h.driver.call_count(), 1);
    assert_eq!(h.repository.load(&started.id).await?.graph, started.graph);
    Ok(())
}

#[tokio::test]
async fn test_failed_continuation_leaves_record_untouched() -> anyhow::Result<()> {
    let h = harness(
        MockDriver::new()
            .script(FLASH, vec![MockResponse::Text(story_json()), garbage()])
            .always(PRO, unauthorized()),
    );
    let started = start(&h).await;

    let err = h
        .service
        .continue_story(&started.id.to_string(), "node_1", "choice_1")
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::PermanentService);
    assert_eq!(h.repository.load(&started.id).await?.graph, started.graph);
    Ok(())
}

#[tokio::test]
async fn test_list_stories() -> anyhow::Result<()> {
    let h = harness(MockDriver::new().always_text(FLASH, story_json()));
    assert!(h.service.list_stories().await?.is_empty());

    let first = start(&h).await;
    let second = start(&h).await;

    let summaries = h.service.list_stories().await?;
    assert_eq!(summaries.len(), 2);
    let ids: Vec<StoryId> = summaries.iter().map(|s| s.id).collect();
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));
    assert!(summaries.iter().all(|s| s.title == "The Keeper" && s.steps == 0));
    Ok(())
}
