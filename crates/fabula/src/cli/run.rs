//! Command handlers.

use super::{Cli, Commands};
use fabula::{
    FabulaConfig, FabulaError, FabulaResult, FileSystemStoryRepository, GeminiClient, JsonError,
    ModelInvoker, StoryEngine, StoryError, StoryGenerationRequest, StoryId, StoryRepository,
    StoryService,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Execute the parsed command, printing its result as JSON on stdout.
#[instrument(skip_all)]
pub async fn run_command(cli: Cli) -> FabulaResult<()> {
    let config = FabulaConfig::load_from(cli.config.as_deref())?;
    let store = cli
        .store
        .clone()
        .unwrap_or_else(|| config.storage.resolved_path());
    debug!(store = %store.display(), models = ?config.generation.models, "Loaded configuration");

    let repository: Arc<dyn StoryRepository> = Arc::new(FileSystemStoryRepository::new(store)?);

    match cli.command {
        Commands::Start {
            premise,
            genre,
            style,
            constraints,
        } => {
            let mut builder = StoryGenerationRequest::builder();
            builder.premise(premise).constraints(constraints);
            if let Some(genre) = genre {
                builder.genre(genre);
            }
            if let Some(style) = style {
                builder.style(style);
            }
            let request = builder
                .build()
                .map_err(|e| StoryError::validation(e.to_string()))?;

            let started = story_service(&config, repository)?
                .start_story(&request)
                .await?;
            print_json(&started)
        }

        Commands::Continue {
            story_id,
            node,
            choice,
        } => {
            let continued = story_service(&config, repository)?
                .continue_story(&story_id, &node, &choice)
                .await?;
            print_json(&continued)
        }

        Commands::Show { story_id } => {
            let id: StoryId = story_id.parse()?;
            let record = repository.load(&id).await?;
            print_json(&record)
        }

        Commands::List => {
            let summaries = repository.list().await?;
            print_json(&summaries)
        }
    }
}

/// Print an error as `{"error": <category>, "message": <text>}` on stderr.
///
/// The source location is logged but never printed.
pub fn report_error(err: &FabulaError) {
    tracing::error!(category = %err.category(), error = %err, "Command failed");
    eprintln!("{}", error_report(err));
}

fn error_report(err: &FabulaError) -> Value {
    json!({
        "error": err.category().to_string(),
        "message": err.message(),
    })
}

/// The Gemini client is only built for commands that generate, so reading
/// stories works without an API key.
fn story_service(
    config: &FabulaConfig,
    repository: Arc<dyn StoryRepository>,
) -> FabulaResult<StoryService> {
    let driver = Arc::new(GeminiClient::new()?);
    let invoker = ModelInvoker::new(driver, config)?;
    Ok(StoryService::new(StoryEngine::new(invoker), repository))
}

fn print_json<T: serde::Serialize>(value: &T) -> FabulaResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| JsonError::new(e.to_string()))?;
    println!("{}", text);
    Ok(())
}
