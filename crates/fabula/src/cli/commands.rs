//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fabula - branching interactive fiction generated by language models
#[derive(Parser, Debug)]
#[command(name = "fabula")]
#[command(about = "Generate and play branching stories with language models", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file layered over the bundled and user defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of story files (overrides `[storage] path`)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Export tracing spans to stdout through OpenTelemetry
    #[arg(long, global = true)]
    pub telemetry: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new story and store it
    Start {
        /// What the story is about
        #[arg(long)]
        premise: String,

        /// Genre to write in
        #[arg(long)]
        genre: Option<String>,

        /// Narrative voice or tone
        #[arg(long)]
        style: Option<String>,

        /// Constraint the story must respect (repeatable)
        #[arg(long = "constraint")]
        constraints: Vec<String>,
    },

    /// Pick a choice on the current scene of a stored story
    Continue {
        /// ID of the stored story
        story_id: String,

        /// Scene the choice was made on
        #[arg(long)]
        node: String,

        /// ID of the selected choice
        #[arg(long)]
        choice: String,
    },

    /// Print a stored story with its full graph
    Show {
        /// ID of the stored story
        story_id: String,
    },

    /// List stored stories, most recently played first
    List,
}
