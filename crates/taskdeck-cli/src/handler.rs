//! Command handlers: run store operations and render their results.

use std::{fs, io::Read, path::Path};

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde::Deserialize;
use taskdeck_core::{
    display::{
        CreateResult, DeleteResult, HistoryList, OperationStatus, ProjectList, TodoList,
        UpdateResult,
    },
    models::{Project, ProjectPatch, Todo, TodoFilter, TodoPatch},
    params::{
        CreateProject, GenerateTodos, HistoryId, Id, ListTodos, RegenerateTodo, SearchHistory,
        TodoDraft, TodoId, TodoNotes, UpdateProject,
    },
    HistoryLog, ProjectStore, StoreError,
};

use crate::{
    cli::{
        HistoryCommands, ImportTodosArgs, ProjectCommands, ReadyTodosArgs, ShowProjectArgs,
        TodoCommands,
    },
    renderer::TerminalRenderer,
};

/// Accepted layouts of an import file.
#[derive(Deserialize)]
#[serde(untagged)]
enum DraftFile {
    Drafts(Vec<TodoDraft>),
    Batch {
        #[serde(default)]
        prompt: Option<String>,
        todos: Vec<TodoDraft>,
    },
}

/// Runs CLI commands against one store and history log.
pub struct Cli {
    store: ProjectStore,
    history: HistoryLog,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(store: ProjectStore, history: HistoryLog, renderer: TerminalRenderer) -> Self {
        Self {
            store,
            history,
            renderer,
        }
    }

    /// Writes any state a failed save left behind.
    pub fn finish(mut self) -> Result<()> {
        self.store.flush().context("Failed to save project state")
    }

    /// Ensures the default project exists and shows the active project.
    pub fn show_home(&mut self) -> Result<()> {
        if self.store.ensure_default_project() {
            info!("Created default project");
        }

        match self.store.active_project() {
            Some(project) => self.renderer.render(&project.to_string()),
            None => {
                if let Some(id) = self.store.active_project_id() {
                    self.renderer
                        .warn(&format!("Active project '{id}' does not exist"));
                }
                let summaries = self.store.summaries();
                self.renderer
                    .render(&ProjectList::with_title(&summaries, "Projects").to_string())
            }
        }
    }

    pub fn handle_project_command(&mut self, command: ProjectCommands) -> Result<()> {
        match command {
            ProjectCommands::Create(args) => self.create_project(&args.into()),
            ProjectCommands::List => self.list_projects(),
            ProjectCommands::Show(args) => self.show_project(&args),
            ProjectCommands::Update(args) => self.update_project(args.into()),
            ProjectCommands::Select(args) => self.select_project(&args.into()),
            ProjectCommands::Complete(args) => self.update_project(args.into()),
            ProjectCommands::Remove(args) => self.remove_project(&args.into()),
            ProjectCommands::Context(args) => self.project_context(&args),
        }
    }

    pub fn handle_todo_command(&mut self, command: TodoCommands) -> Result<()> {
        match command {
            TodoCommands::Import(args) => self.import_todos(args),
            TodoCommands::List(args) => self.list_todos(&args.into()),
            TodoCommands::Ready(args) => self.ready_todos(&args),
            TodoCommands::Show(args) => self.show_todo(&args.into()),
            TodoCommands::Toggle(args) => self.toggle_todo(&args.into()),
            TodoCommands::Note(args) => self.note_todo(&args.into()),
            TodoCommands::Regenerate(args) => self.regenerate_todo(args.into()),
            TodoCommands::Remove(args) => self.remove_todo(&args.into()),
        }
    }

    pub fn handle_history_command(&mut self, command: HistoryCommands) -> Result<()> {
        match command {
            HistoryCommands::List => {
                let entries = self.history.list()?;
                self.renderer
                    .render(&HistoryList::with_title(&entries, "History").to_string())
            }
            HistoryCommands::Show(args) => self.show_history(&args.into()),
            HistoryCommands::Search(args) => self.search_history(&args.into()),
            HistoryCommands::Remove(args) => {
                let HistoryId { id } = args.into();
                let entry = self.history.remove(id)?;
                self.renderer.render(&DeleteResult::new(entry).to_string())
            }
        }
    }

    /// The project named by `id`, or the active project.
    fn target_project(&self, id: Option<&str>) -> Result<&Project> {
        match id {
            Some(id) => Ok(self
                .store
                .get_project(id)
                .ok_or_else(|| StoreError::project_not_found(id))?),
            None => self.store.active_project().context(
                "No active project. Select one with `td project select <ID>` or pass a project ID",
            ),
        }
    }

    /// Warns when a todo id is shared by several projects, since every copy
    /// is changed by todo commands.
    fn warn_if_shared(&self, todo_id: &str) {
        let owners = self.store.todo_owners(todo_id);
        if owners.len() > 1 {
            warn!("Todo ID '{todo_id}' is shared by projects {owners:?}");
            self.renderer.warn(&format!(
                "Todo ID '{todo_id}' exists in {} projects ({}); all copies are affected",
                owners.len(),
                owners.join(", ")
            ));
        }
    }

    fn todo_or_not_found(&self, todo_id: &str) -> Result<&Todo> {
        Ok(self
            .store
            .get_todo_by_id(todo_id)
            .ok_or_else(|| StoreError::todo_not_found(todo_id))?)
    }

    fn create_project(&mut self, params: &CreateProject) -> Result<()> {
        let project = self.store.create_project(params)?;
        self.renderer.render(&CreateResult::new(project).to_string())
    }

    fn list_projects(&self) -> Result<()> {
        let summaries = self.store.summaries();
        self.renderer
            .render(&ProjectList::with_title(&summaries, "Projects").to_string())
    }

    fn show_project(&self, args: &ShowProjectArgs) -> Result<()> {
        let project = self.target_project(args.id.as_deref())?;
        self.renderer.render(&project.to_string())
    }

    fn update_project(&mut self, params: UpdateProject) -> Result<()> {
        let id = params.id.clone();
        let patch = ProjectPatch::from(params);
        if patch.is_empty() {
            bail!("Nothing to update. Pass at least one field to change");
        }

        let project = self.store.update_project(&id, &patch)?;
        self.renderer
            .render(&UpdateResult::with_changes(project, patch.describe()).to_string())
    }

    fn select_project(&mut self, params: &Id) -> Result<()> {
        self.store.set_active_project(params.id.as_str());
        let message = match self.store.get_project(&params.id) {
            Some(project) => format!("Selected project '{}'", project.name),
            None => {
                self.renderer
                    .warn(&format!("No project has ID '{}'", params.id));
                format!("Selected project ID '{}'", params.id)
            }
        };
        self.renderer
            .render(&OperationStatus::success(message).to_string())
    }

    fn remove_project(&mut self, params: &Id) -> Result<()> {
        let project = self.store.remove_project(&params.id)?;
        self.renderer.render(&DeleteResult::new(project).to_string())
    }

    fn project_context(&self, args: &ShowProjectArgs) -> Result<()> {
        let project_id = self.target_project(args.id.as_deref())?.id.clone();
        let context = self.store.assistant_context(&project_id)?;
        self.renderer.render_raw(&context)
    }

    fn import_todos(&mut self, args: ImportTodosArgs) -> Result<()> {
        let text = read_input(&args.file)?;
        let (file_prompt, todos) = match serde_json::from_str::<DraftFile>(&text)
            .with_context(|| format!("Invalid todo drafts in {}", args.file.display()))?
        {
            DraftFile::Drafts(todos) => (None, todos),
            DraftFile::Batch { prompt, todos } => (prompt, todos),
        };
        let prompt = args
            .prompt
            .or(file_prompt)
            .unwrap_or_else(|| format!("Imported from {}", args.file.display()));

        let batch = GenerateTodos {
            project_id: args.project,
            prompt,
            todos,
        };
        let generated = self.store.append_generated(&batch)?;

        if let Err(e) = self.history.record(&batch.prompt, &generated.todos) {
            warn!("Failed to save to history: {e}");
        }

        let project_name = self
            .store
            .get_project(&generated.project_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        let mut output = String::new();
        if generated.created_project {
            output.push_str(
                &OperationStatus::success(format!(
                    "Created project '{project_name}' (ID: {})",
                    generated.project_id
                ))
                .to_string(),
            );
        }
        output.push_str(
            &OperationStatus::success(format!(
                "Added {} todos to '{project_name}'",
                generated.todos.len()
            ))
            .to_string(),
        );
        output.push('\n');

        let todos: Vec<&Todo> = generated.todos.iter().collect();
        output.push_str(&TodoList::new(&todos).to_string());
        self.renderer.render(&output)
    }

    fn list_todos(&self, params: &ListTodos) -> Result<()> {
        let filter = TodoFilter::try_from(params)?;
        let project = self.target_project(params.project_id.as_deref())?;
        let todos = project.todos_matching(&filter);
        let title = format!("Todos in {}", project.name);
        self.renderer
            .render(&TodoList::with_title(&todos, &title).to_string())
    }

    fn ready_todos(&self, args: &ReadyTodosArgs) -> Result<()> {
        let project = self.target_project(args.project.as_deref())?;
        let ready = project.ready_todos();
        let blocked = project.blocked_todos();

        let mut output = TodoList::with_title(&ready, "Ready").to_string();
        if !blocked.is_empty() {
            output.push('\n');
            output.push_str(&TodoList::with_title(&blocked, "Blocked").to_string());
        }
        self.renderer.render(&output)
    }

    fn show_todo(&self, params: &TodoId) -> Result<()> {
        let todo = self.todo_or_not_found(&params.id)?;
        self.warn_if_shared(&params.id);
        self.renderer.render(&todo.to_string())
    }

    fn toggle_todo(&mut self, params: &TodoId) -> Result<()> {
        self.store.toggle_todo_completed(&params.id)?;
        self.warn_if_shared(&params.id);

        let todo = self.todo_or_not_found(&params.id)?;
        let state = if todo.completed { "done" } else { "open" };
        self.renderer.render(
            &OperationStatus::success(format!("Marked '{}' as {state}", todo.task)).to_string(),
        )
    }

    fn note_todo(&mut self, params: &TodoNotes) -> Result<()> {
        self.store.update_todo_notes(&params.id, &params.notes)?;
        self.warn_if_shared(&params.id);

        let todo = self.todo_or_not_found(&params.id)?;
        self.renderer.render(
            &OperationStatus::success(format!("Updated notes of '{}'", todo.task)).to_string(),
        )
    }

    fn regenerate_todo(&mut self, params: RegenerateTodo) -> Result<()> {
        let id = params.id.clone();
        let patch = TodoPatch::try_from(params)?;
        if patch.is_empty() {
            bail!("Nothing to regenerate. Pass at least one field to replace");
        }

        self.store.regenerate_todo(&id, &patch)?;
        self.warn_if_shared(&id);

        let todo = self.todo_or_not_found(&id)?.clone();
        self.renderer
            .render(&UpdateResult::with_changes(todo, patch.describe()).to_string())
    }

    fn remove_todo(&mut self, params: &TodoId) -> Result<()> {
        let task = self.todo_or_not_found(&params.id)?.task.clone();
        self.warn_if_shared(&params.id);
        let removed = self.store.remove_todo(&params.id)?;

        let message = if removed == 1 {
            format!("Removed todo '{task}'")
        } else {
            format!("Removed {removed} todos with ID '{}'", params.id)
        };
        self.renderer
            .render(&OperationStatus::success(message).to_string())
    }

    fn show_history(&self, params: &HistoryId) -> Result<()> {
        let entry = self
            .history
            .get(params.id)?
            .ok_or(StoreError::HistoryNotFound { id: params.id })?;
        let todos: Vec<&Todo> = entry.todos.iter().collect();

        let mut output = entry.to_string();
        output.push_str(&TodoList::with_title(&todos, "Generated todos").to_string());
        self.renderer.render(&output)
    }

    fn search_history(&self, params: &SearchHistory) -> Result<()> {
        let entries = self.history.search(&params.query)?;
        let title = format!("History matching \"{}\"", params.query);
        self.renderer
            .render(&HistoryList::with_title(&entries, &title).to_string())
    }
}

/// Reads a file, or stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read todo drafts from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
