//! CLI argument parsing using clap.
//!
//! Contains the Cli struct and the Commands enum.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

use crate::documents::EntityType;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

fn parse_entity_type(value: &str) -> Result<EntityType, String> {
    value.parse()
}

/// Workspace document intelligence
#[derive(Parser)]
#[command(
    name = "worklens",
    version = env!("CARGO_PKG_VERSION"),
    about = "Index, diff, and patch a markdown work-management workspace",
    long_about = "Keep a structured index over a markdown workspace: classify documents by \
                  directory, look them up by stable id, preview edits as diffs, and apply \
                  them with automatic backups.",
    styles = clap_cargo_style(),
    after_help = "Examples:\n  worklens init\n  worklens index\n  worklens list --type project\n  worklens get project:alpha --json\n  worklens diff projects/alpha.md /tmp/alpha-new.md\n  worklens apply projects/alpha.md /tmp/alpha-new.md\n  worklens watch"
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize workspace
    #[command(about = "Set up .worklens directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Index workspace documents
    #[command(about = "Index every markdown document in the workspace")]
    Index {
        /// Single file or directory to index instead of the whole workspace
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// List indexed documents
    #[command(about = "List indexed documents, optionally filtered by type")]
    List {
        /// Filter by entity type (project, epic, decision, risk, meeting,
        /// person, log, unknown)
        #[arg(long = "type", value_name = "TYPE", value_parser = parse_entity_type)]
        entity_type: Option<EntityType>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one document
    #[command(about = "Show the indexed record for a document id")]
    Get {
        /// Document id, e.g. project:alpha
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Preview a change as a diff
    #[command(
        about = "Diff a workspace document against a candidate file",
        after_help = "Examples:\n  worklens diff projects/alpha.md /tmp/alpha-new.md\n  worklens diff projects/alpha.md /tmp/alpha-new.md --context 5"
    )]
    Diff {
        /// Workspace document
        path: PathBuf,

        /// File holding the proposed content
        candidate: PathBuf,

        /// Unchanged context lines around each hunk
        #[arg(long, default_value_t = 3)]
        context: usize,
    },

    /// Apply a change with backup
    #[command(about = "Overwrite a document with a candidate file's content and re-index it")]
    Apply {
        /// Workspace document
        path: PathBuf,

        /// File holding the new content
        candidate: PathBuf,

        /// Skip the .bak backup
        #[arg(long)]
        no_backup: bool,
    },

    /// Undo the last applied change
    #[command(about = "Restore a document from its .bak backup and re-index it")]
    Restore {
        /// Workspace document
        path: PathBuf,
    },

    /// Watch the workspace
    #[command(about = "Re-index documents as they change, until interrupted")]
    Watch,

    /// Show current configuration settings
    #[command(about = "Display active settings from .worklens/settings.toml")]
    Config,

    /// Show workspace status
    #[command(about = "Show index location and per-type document counts")]
    Status,
}
