use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{HistoryCommands, ProjectCommands, TodoCommands};

/// Project and todo manager for generated task lists
///
/// taskdeck keeps projects, each with an ordered list of todos, plus a
/// pointer to the active project. Generated todo batches can be imported
/// from JSON or pushed by an AI assistant through the MCP server.
#[derive(Parser)]
#[command(version, about, name = "td")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/taskdeck/taskdeck.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the taskdeck CLI
///
/// Without a command, td makes sure a default project exists and shows the
/// active project.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage projects
    #[command(alias = "p")]
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage todos
    #[command(alias = "t")]
    Todo {
        #[command(subcommand)]
        command: TodoCommands,
    },
    /// Browse the generation history
    #[command(alias = "h")]
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Start the MCP server
    Serve,
}
