//! CLI entry point for course-rag.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Course question answering CLI
#[derive(Parser, Debug)]
#[command(
    name = "course-rag",
    version,
    about = "Ask questions about course materials"
)]
pub struct Cli {
    /// Config file (default: <config dir>/course-rag/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer one question and print its sources
    Ask(AskArgs),
    /// Interactive session on stdin
    Chat(ChatArgs),
    /// List the courses in the repository
    Courses,
}

/// Arguments for the `ask` subcommand.
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question
    pub query: String,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub model: ModelArgs,
}

/// Overrides shared by `ask` and `chat`.
#[derive(Parser, Debug, Default)]
pub struct ModelArgs {
    /// Rounds of tool use before the model must answer
    #[arg(long)]
    pub max_rounds: Option<usize>,

    /// Model id (e.g. claude-sonnet-4-20250514)
    #[arg(short, long)]
    pub model: Option<String>,
}

impl ModelArgs {
    /// Apply the overrides on top of a loaded config.
    pub fn apply(&self, mut config: crate::config::RagConfig) -> crate::config::RagConfig {
        if let Some(rounds) = self.max_rounds {
            config = config.with_max_tool_rounds(rounds);
        }
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        config
    }
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
