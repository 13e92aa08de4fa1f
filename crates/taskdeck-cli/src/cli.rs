//! Command-line argument definitions.
//!
//! Each clap argument struct converts into the matching core parameter type,
//! so the CLI and the MCP server feed the store identical inputs and share
//! its validation.
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → ProjectStore
//! ```

use std::{fmt, path::PathBuf};

use clap::{Args, Subcommand, ValueEnum};
use taskdeck_core::params::*;

/// Create a new, empty project
#[derive(Args)]
pub struct CreateProjectArgs {
    /// Name of the project
    pub name: String,
    #[arg(short, long, help = "Optional description of the project")]
    pub description: Option<String>,
    #[arg(short, long, help = "The request this project is meant to fulfil")]
    pub prompt: Option<String>,
    /// Make the new project the active one
    #[arg(short, long)]
    pub select: bool,
}

impl From<CreateProjectArgs> for CreateProject {
    fn from(val: CreateProjectArgs) -> Self {
        CreateProject {
            name: val.name,
            description: val.description,
            prompt: val.prompt,
            select: val.select,
        }
    }
}

/// Show a project; defaults to the active project
#[derive(Args)]
pub struct ShowProjectArgs {
    #[arg(help = "ID of the project (defaults to the active project)")]
    pub id: Option<String>,
}

/// Update project fields
#[derive(Args)]
pub struct UpdateProjectArgs {
    #[arg(help = "ID of the project to update")]
    pub id: String,
    #[arg(short, long, help = "New project name")]
    pub name: Option<String>,
    #[arg(short, long, help = "New description")]
    pub description: Option<String>,
    #[arg(short, long, help = "New originating prompt")]
    pub prompt: Option<String>,
}

impl From<UpdateProjectArgs> for UpdateProject {
    fn from(val: UpdateProjectArgs) -> Self {
        UpdateProject {
            id: val.id,
            name: val.name,
            description: val.description,
            prompt: val.prompt,
            completed: None,
        }
    }
}

/// Mark a whole project as completed (or open again)
#[derive(Args)]
pub struct CompleteProjectArgs {
    #[arg(help = "ID of the project")]
    pub id: String,
    /// Reopen the project instead
    #[arg(long)]
    pub undo: bool,
}

impl From<CompleteProjectArgs> for UpdateProject {
    fn from(val: CompleteProjectArgs) -> Self {
        UpdateProject {
            id: val.id,
            completed: Some(!val.undo),
            ..Default::default()
        }
    }
}

/// Arguments naming exactly one project
#[derive(Args)]
pub struct ProjectIdArgs {
    #[arg(help = "ID of the project")]
    pub id: String,
}

impl From<ProjectIdArgs> for Id {
    fn from(val: ProjectIdArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a new project
    #[command(alias = "c")]
    Create(CreateProjectArgs),
    /// List all projects
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show a project with its todos
    #[command(alias = "s")]
    Show(ShowProjectArgs),
    /// Update a project's name, description or prompt
    #[command(alias = "u")]
    Update(UpdateProjectArgs),
    /// Make a project the active one
    Select(ProjectIdArgs),
    /// Mark a project as completed
    Complete(CompleteProjectArgs),
    /// Remove a project and its todos
    #[command(alias = "rm")]
    Remove(ProjectIdArgs),
    /// Print a project as JSON context for an assistant
    Context(ShowProjectArgs),
}

/// Import a generated batch of todos from a JSON file
///
/// The file holds an array of todo drafts with `task`, `explanation`,
/// `category`, `priority`, `difficulty`, `time` and `dependencies` (1-based
/// positions within the batch). Use `-` to read from stdin.
#[derive(Args)]
pub struct ImportTodosArgs {
    #[arg(help = "JSON file with todo drafts, or - for stdin")]
    pub file: PathBuf,
    #[arg(long, help = "Target project (defaults to the active project)")]
    pub project: Option<String>,
    #[arg(long, help = "The request the todos were generated from")]
    pub prompt: Option<String>,
}

/// Todo completion state accepted by `--status`
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Only open todos
    Open,
    /// Only completed todos
    Done,
}

impl fmt::Display for StatusArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusArg::Open => write!(f, "open"),
            StatusArg::Done => write!(f, "done"),
        }
    }
}

/// List the todos of a project
#[derive(Args)]
pub struct ListTodosArgs {
    #[arg(long, help = "Project to list (defaults to the active project)")]
    pub project: Option<String>,
    #[arg(short, long, help = "Only open or only done todos")]
    pub status: Option<StatusArg>,
    #[arg(short, long, help = "Only todos with this priority (high, medium, low)")]
    pub priority: Option<String>,
    #[arg(short, long, help = "Only todos with this difficulty (easy, medium, hard)")]
    pub difficulty: Option<String>,
    #[arg(short, long, help = "Only todos in this category")]
    pub category: Option<String>,
    #[arg(long, help = "Sort by insertion, order, priority or estimate")]
    pub sort: Option<String>,
}

impl From<ListTodosArgs> for ListTodos {
    fn from(val: ListTodosArgs) -> Self {
        ListTodos {
            project_id: val.project,
            status: val.status.map(|s| s.to_string()),
            priority: val.priority,
            difficulty: val.difficulty,
            category: val.category,
            sort: val.sort,
        }
    }
}

/// Show ready and blocked todos of a project
#[derive(Args)]
pub struct ReadyTodosArgs {
    #[arg(long, help = "Project to inspect (defaults to the active project)")]
    pub project: Option<String>,
}

/// Arguments naming one todo
#[derive(Args)]
pub struct TodoIdArgs {
    #[arg(help = "ID of the todo")]
    pub id: String,
}

impl From<TodoIdArgs> for TodoId {
    fn from(val: TodoIdArgs) -> Self {
        TodoId { id: val.id }
    }
}

/// Replace a todo's notes
#[derive(Args)]
pub struct NoteTodoArgs {
    #[arg(help = "ID of the todo")]
    pub id: String,
    #[arg(help = "New notes text (empty clears the notes)")]
    pub notes: String,
}

impl From<NoteTodoArgs> for TodoNotes {
    fn from(val: NoteTodoArgs) -> Self {
        TodoNotes {
            id: val.id,
            notes: val.notes,
        }
    }
}

/// Replace generated fields of a todo
///
/// Completion, order and notes are kept.
#[derive(Args)]
pub struct RegenerateTodoArgs {
    #[arg(help = "ID of the todo")]
    pub id: String,
    #[arg(short, long, help = "New task title")]
    pub task: Option<String>,
    #[arg(short, long, help = "New explanation")]
    pub explanation: Option<String>,
    #[arg(short, long, help = "New category")]
    pub category: Option<String>,
    #[arg(short, long, help = "New priority (high, medium, low)")]
    pub priority: Option<String>,
    #[arg(short, long, help = "New difficulty (easy, medium, hard)")]
    pub difficulty: Option<String>,
    #[arg(long, help = "New estimate, e.g. \"45 min\" or \"1h 30m\" (empty removes it)")]
    pub time: Option<String>,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Replacement dependency IDs as comma-separated list"
    )]
    pub dependencies: Option<Vec<String>>,
}

impl From<RegenerateTodoArgs> for RegenerateTodo {
    fn from(val: RegenerateTodoArgs) -> Self {
        RegenerateTodo {
            id: val.id,
            task: val.task,
            explanation: val.explanation,
            category: val.category,
            priority: val.priority,
            difficulty: val.difficulty,
            time: val.time,
            dependencies: val.dependencies,
        }
    }
}

#[derive(Subcommand)]
pub enum TodoCommands {
    /// Import a generated batch of todos
    #[command(alias = "i")]
    Import(ImportTodosArgs),
    /// List todos of a project
    #[command(aliases = ["l", "ls"])]
    List(ListTodosArgs),
    /// Show todos that can be started now
    Ready(ReadyTodosArgs),
    /// Show a todo
    #[command(alias = "s")]
    Show(TodoIdArgs),
    /// Flip a todo between open and done
    Toggle(TodoIdArgs),
    /// Set a todo's notes
    Note(NoteTodoArgs),
    /// Replace generated fields of a todo
    Regenerate(RegenerateTodoArgs),
    /// Remove a todo
    #[command(alias = "rm")]
    Remove(TodoIdArgs),
}

/// Arguments naming one history entry
#[derive(Args)]
pub struct HistoryIdArgs {
    #[arg(help = "ID of the history entry")]
    pub id: u64,
}

impl From<HistoryIdArgs> for HistoryId {
    fn from(val: HistoryIdArgs) -> Self {
        HistoryId { id: val.id }
    }
}

/// Search the generation history
#[derive(Args)]
pub struct SearchHistoryArgs {
    #[arg(help = "Text matched against prompts, tasks and categories")]
    pub query: String,
}

impl From<SearchHistoryArgs> for SearchHistory {
    fn from(val: SearchHistoryArgs) -> Self {
        SearchHistory { query: val.query }
    }
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List history entries, newest first
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show a history entry with its todos
    #[command(alias = "s")]
    Show(HistoryIdArgs),
    /// Search history entries
    #[command(alias = "f")]
    Search(SearchHistoryArgs),
    /// Remove a history entry
    #[command(alias = "rm")]
    Remove(HistoryIdArgs),
}
