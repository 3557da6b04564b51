//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use pinboard_core::pins::{EntityRef, EntityType};

/// Manage pinned items from the command line.
#[derive(Debug, Parser)]
#[command(name = "pinboard")]
#[command(version, about = "Manage pinned items", long_about = None)]
pub struct Cli {
    /// SQLite database path. Overrides `PINBOARD_DB_PATH`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// User whose pins to manage.
    #[arg(long, env = "PINBOARD_USER")]
    pub user: Uuid,

    /// Output format.
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// A typed entity reference given on the command line.
#[derive(Debug, Clone, Args)]
pub struct EntityArgs {
    /// Entity type (task, project, contact, routine, list).
    pub entity_type: EntityType,
    /// Entity ID.
    pub entity_id: Uuid,
}

impl EntityArgs {
    pub fn entity(&self) -> EntityRef {
        EntityRef::new(self.entity_type, self.entity_id)
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Pin an entity.
    Pin(EntityArgs),
    /// Unpin an entity.
    Unpin(EntityArgs),
    /// Record an access to a pinned entity.
    Touch(EntityArgs),
    /// Reorder pins. Every current pin ID must be listed once.
    Reorder {
        /// Pin IDs in their new order.
        #[arg(required = true, num_args = 1..)]
        ids: Vec<Uuid>,
    },
    /// List pins in display order.
    List,
    /// Remove pins idle past the auto-unpin threshold.
    Sweep,
}
