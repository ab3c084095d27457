//! Round-trip tests for both story repositories.

use fabula_core::{Choice, GeneratedStory, StoryGraph, StoryId, StoryNode, StoryRecord};
use fabula_error::ErrorCategory;
use fabula_interface::StoryRepository;
use fabula_storage::{FileSystemStoryRepository, InMemoryStoryRepository};

fn scene(id: &str, is_ending: bool) -> StoryNode {
    StoryNode {
        id: id.to_string(),
        content: format!("Scene {id}"),
        choices: if is_ending {
            vec![]
        } else {
            vec![Choice {
                id: format!("{id}_a"),
                text: format!("Leave {id}"),
                next_node_id: String::new(),
            }]
        },
        is_ending,
    }
}

fn record() -> StoryRecord {
    let story = GeneratedStory {
        title: "The Keeper".to_string(),
        description: "A lighthouse story".to_string(),
        setting: "A storm-bound lighthouse".to_string(),
        characters: vec![],
        first_node: scene("node_1", false),
    };
    let graph = StoryGraph::initialize(&story);
    StoryRecord::new(story, graph, Some("mystery".to_string()))
}

async fn exercise(repo: &dyn StoryRepository) -> anyhow::Result<()> {
    let record = record();
    repo.insert(&record).await?;

    let loaded = repo.load(&record.id).await?;
    assert_eq!(loaded, record);

    let graph = loaded
        .graph
        .advance(scene("node_3", false), "Leave node_1")
        .advance(scene("node_2", false), "Leave node_3")
        .advance(scene("node_end", true), "Leave node_2");
    repo.save(&record.id, &graph, true).await?;

    let saved = repo.load(&record.id).await?;
    assert_eq!(saved.graph, graph);
    assert_eq!(
        saved.graph.previous_choices(),
        &vec!["Leave node_1", "Leave node_3", "Leave node_2"]
    );
    assert!(saved.completed);
    assert!(saved.updated_at >= saved.created_at);
    assert_eq!(saved.genre.as_deref(), Some("mystery"));

    let summaries = repo.list().await?;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, record.id);
    assert_eq!(summaries[0].steps, 3);
    assert!(summaries[0].completed);

    let missing = repo.load(&StoryId::new()).await.unwrap_err();
    assert_eq!(missing.category(), ErrorCategory::NotFound);
    Ok(())
}

#[tokio::test]
async fn test_in_memory_round_trip() -> anyhow::Result<()> {
    exercise(&InMemoryStoryRepository::new()).await
}

#[tokio::test]
async fn test_filesystem_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let repo = FileSystemStoryRepository::new(dir.path().join("stories"))?;

    exercise(&repo).await?;

    // Only the final file remains after atomic writes
    let files: Vec<_> = std::fs::read_dir(repo.base_path())?.collect::<Result<_, _>>()?;
    assert_eq!(files.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_filesystem_reopen_sees_stories() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let record = record();

    FileSystemStoryRepository::new(dir.path())?.insert(&record).await?;
    let reopened = FileSystemStoryRepository::new(dir.path())?;

    assert_eq!(reopened.load(&record.id).await?.story.title, "The Keeper");
    Ok(())
}

#[tokio::test]
async fn test_filesystem_corrupt_file_is_reported() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let repo = FileSystemStoryRepository::new(dir.path())?;
    let id = StoryId::new();
    std::fs::write(dir.path().join(format!("{}.json", id)), "{not json")?;

    let err = repo.load(&id).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::PermanentService);

    // Listing skips the unreadable file instead of failing
    assert!(repo.list().await?.is_empty());
    Ok(())
}
