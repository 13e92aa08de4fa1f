//! MCP server implementation for taskdeck
//!
//! Exposes the project store and the generation history as MCP tools so an
//! assistant can read projects, append generated todos, and track progress.
//! Every tool returns the same markdown the CLI prints.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info, warn};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use taskdeck_core::{
    display::{
        CreateResult, DeleteResult, HistoryList, OperationStatus, ProjectList, TodoList,
        UpdateResult,
    },
    models::{Project, ProjectPatch, Todo, TodoFilter, TodoPatch},
    params::{
        CreateProject, GenerateTodos, HistoryId, Id, ListTodos, RegenerateTodo, SearchHistory,
        TodoId, TodoNotes, UpdateProject,
    },
    HistoryLog, ProjectStore, StoreError,
};
use tokio::sync::{Mutex, MutexGuard};

/// Parameters for tools that default to the active project
#[derive(Debug, Default, Deserialize, JsonSchema)]
struct ProjectParams {
    /// Project ID; the active project is used when omitted
    project_id: Option<String>,
}

type McpResult = Result<CallToolResult, ErrorData>;

fn text(result: String) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(result)]))
}

/// Lookups and validation failures are the caller's fault; anything else is
/// an internal error.
fn tool_error(e: StoreError) -> ErrorData {
    if e.is_not_found() || matches!(e, StoreError::InvalidInput { .. }) {
        ErrorData::invalid_params(e.to_string(), None)
    } else {
        ErrorData::internal_error(e.to_string(), None)
    }
}

#[derive(Clone)]
pub struct TaskdeckMcpServer {
    store: Arc<Mutex<ProjectStore>>,
    history: Arc<Mutex<HistoryLog>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl TaskdeckMcpServer {
    pub fn new(store: ProjectStore, history: HistoryLog) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            history: Arc::new(Mutex::new(history)),
            tool_router: Self::tool_router(),
        }
    }

    /// Locks the store, first refreshing it so edits made by other processes
    /// are visible.
    async fn store(&self) -> MutexGuard<'_, ProjectStore> {
        let mut store = self.store.lock().await;
        store.refresh();
        store
    }

    /// Writes any state a failed save left behind.
    pub async fn flush(&self) -> Result<()> {
        self.store.lock().await.flush()?;
        Ok(())
    }

    #[tool(
        name = "list_projects",
        description = "List every project with its ID, description, todo progress, and remaining time estimate. The active project is marked with ★."
    )]
    async fn list_projects(&self) -> McpResult {
        debug!("list_projects");

        let store = self.store().await;
        let summaries = store.summaries();
        text(ProjectList::with_title(&summaries, "Projects").to_string())
    }

    #[tool(
        name = "show_project",
        description = "Show a project with all of its todos. Defaults to the active project when project_id is omitted."
    )]
    async fn show_project(&self, Parameters(params): Parameters<ProjectParams>) -> McpResult {
        debug!("show_project: {params:?}");

        let store = self.store().await;
        let project = target_project(&store, params.project_id.as_deref())?;
        text(project.to_string())
    }

    #[tool(
        name = "create_project",
        description = "Create a new, empty project. Provide a name (required), an optional description and prompt, and select=true to make it the active project."
    )]
    async fn create_project(&self, Parameters(params): Parameters<CreateProject>) -> McpResult {
        debug!("create_project: {params:?}");

        let mut store = self.store().await;
        let project = store.create_project(&params).map_err(tool_error)?;
        text(CreateResult::new(project).to_string())
    }

    #[tool(
        name = "update_project",
        description = "Update the name, description, prompt, or completion flag of a project. Fields that are omitted keep their current value."
    )]
    async fn update_project(&self, Parameters(params): Parameters<UpdateProject>) -> McpResult {
        debug!("update_project: {params:?}");

        let id = params.id.clone();
        let patch = ProjectPatch::from(params);
        if patch.is_empty() {
            return Err(ErrorData::invalid_params(
                "Nothing to update. Provide at least one field",
                None,
            ));
        }

        let mut store = self.store().await;
        let project = store.update_project(&id, &patch).map_err(tool_error)?;
        text(UpdateResult::with_changes(project, patch.describe()).to_string())
    }

    #[tool(
        name = "select_project",
        description = "Make a project the active one. Tools that take an optional project_id fall back to the active project."
    )]
    async fn select_project(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("select_project: {params:?}");

        let mut store = self.store().await;
        store.set_active_project(params.id.as_str());

        let status = match store.get_project(&params.id) {
            Some(project) => OperationStatus::success(format!(
                "Selected project '{}' (ID: {})",
                project.name, project.id
            )),
            None => OperationStatus::failure(format!(
                "Selected project ID '{}', but no project has that ID",
                params.id
            )),
        };
        text(status.to_string())
    }

    #[tool(
        name = "remove_project",
        description = "Permanently remove a project and all of its todos. If it was the active project, no project is active afterwards."
    )]
    async fn remove_project(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("remove_project: {params:?}");

        let mut store = self.store().await;
        let project = store.remove_project(&params.id).map_err(tool_error)?;
        text(DeleteResult::new(project).to_string())
    }

    #[tool(
        name = "add_todos",
        description = "Append a batch of generated todos to a project. Each todo needs a task; explanation, category, priority (High/Medium/Low), difficulty (Easy/Medium/Hard), time estimate, and dependencies (1-based positions of earlier todos in the batch) are optional. Without project_id the todos go to the active project, or to a new project when none is active. The batch is also saved to the generation history."
    )]
    async fn add_todos(&self, Parameters(params): Parameters<GenerateTodos>) -> McpResult {
        debug!("add_todos: {} todos for {:?}", params.todos.len(), params.project_id);

        let mut store = self.store().await;
        let generated = store.append_generated(&params).map_err(tool_error)?;

        if let Err(e) = self
            .history
            .lock()
            .await
            .record(&params.prompt, &generated.todos)
        {
            warn!("Failed to save to history: {e}");
        }

        let project_name = store
            .get_project(&generated.project_id)
            .map(|p| p.name.as_str())
            .unwrap_or_default();

        let mut result = String::new();
        if generated.created_project {
            let status = OperationStatus::success(format!(
                "Created project '{project_name}' (ID: {})",
                generated.project_id
            ));
            result.push_str(&status.to_string());
        }
        let status = OperationStatus::success(format!(
            "Added {} todos to '{project_name}'",
            generated.todos.len()
        ));
        result.push_str(&status.to_string());
        result.push('\n');

        let todos: Vec<&Todo> = generated.todos.iter().collect();
        result.push_str(&TodoList::new(&todos).to_string());
        text(result)
    }

    #[tool(
        name = "list_todos",
        description = "List the todos of a project, optionally filtered by status ('open' or 'done'), priority, difficulty, or category, and sorted by insertion, order, priority, or estimate. Defaults to the active project."
    )]
    async fn list_todos(&self, Parameters(params): Parameters<ListTodos>) -> McpResult {
        debug!("list_todos: {params:?}");

        let filter = TodoFilter::try_from(&params).map_err(tool_error)?;
        let store = self.store().await;
        let project = target_project(&store, params.project_id.as_deref())?;
        let todos = project.todos_matching(&filter);
        let title = format!("Todos in {}", project.name);
        text(TodoList::with_title(&todos, &title).to_string())
    }

    #[tool(
        name = "ready_todos",
        description = "List the open todos of a project whose dependencies are all done, followed by the todos still blocked. Defaults to the active project."
    )]
    async fn ready_todos(&self, Parameters(params): Parameters<ProjectParams>) -> McpResult {
        debug!("ready_todos: {params:?}");

        let store = self.store().await;
        let project = target_project(&store, params.project_id.as_deref())?;
        let ready = project.ready_todos();
        let blocked = project.blocked_todos();

        let mut result = TodoList::with_title(&ready, "Ready").to_string();
        if !blocked.is_empty() {
            result.push('\n');
            result.push_str(&TodoList::with_title(&blocked, "Blocked").to_string());
        }
        text(result)
    }

    #[tool(
        name = "show_todo",
        description = "Show one todo by ID, searching every project."
    )]
    async fn show_todo(&self, Parameters(params): Parameters<TodoId>) -> McpResult {
        debug!("show_todo: {params:?}");

        let store = self.store().await;
        let todo = find_todo(&store, &params.id)?;
        text(format!("{todo}{}", shared_note(&store, &params.id)))
    }

    #[tool(
        name = "toggle_todo",
        description = "Flip the completion state of a todo. Every todo with this ID, in any project, is toggled."
    )]
    async fn toggle_todo(&self, Parameters(params): Parameters<TodoId>) -> McpResult {
        debug!("toggle_todo: {params:?}");

        let mut store = self.store().await;
        store.toggle_todo_completed(&params.id).map_err(tool_error)?;

        let todo = find_todo(&store, &params.id)?;
        let state = if todo.completed { "done" } else { "open" };
        let status = OperationStatus::success(format!("Marked '{}' as {state}", todo.task));
        text(format!("{status}{}", shared_note(&store, &params.id)))
    }

    #[tool(
        name = "update_todo_notes",
        description = "Replace the free-text notes of a todo. A blank string clears them."
    )]
    async fn update_todo_notes(&self, Parameters(params): Parameters<TodoNotes>) -> McpResult {
        debug!("update_todo_notes: {}", params.id);

        let mut store = self.store().await;
        store
            .update_todo_notes(&params.id, &params.notes)
            .map_err(tool_error)?;

        let todo = find_todo(&store, &params.id)?;
        let status = OperationStatus::success(format!("Updated notes of '{}'", todo.task));
        text(format!("{status}{}", shared_note(&store, &params.id)))
    }

    #[tool(
        name = "regenerate_todo",
        description = "Replace the generated fields of a todo (task, explanation, category, priority, difficulty, time, dependencies) with new values. ID, completion state, order, and notes are kept."
    )]
    async fn regenerate_todo(&self, Parameters(params): Parameters<RegenerateTodo>) -> McpResult {
        debug!("regenerate_todo: {params:?}");

        let id = params.id.clone();
        let patch = TodoPatch::try_from(params).map_err(tool_error)?;
        if patch.is_empty() {
            return Err(ErrorData::invalid_params(
                "Nothing to regenerate. Provide at least one field",
                None,
            ));
        }

        let mut store = self.store().await;
        store.regenerate_todo(&id, &patch).map_err(tool_error)?;

        let todo = find_todo(&store, &id)?.clone();
        let update = UpdateResult::with_changes(todo, patch.describe());
        text(format!("{update}{}", shared_note(&store, &id)))
    }

    #[tool(
        name = "remove_todo",
        description = "Remove a todo by ID from every project that contains it."
    )]
    async fn remove_todo(&self, Parameters(params): Parameters<TodoId>) -> McpResult {
        debug!("remove_todo: {params:?}");

        let mut store = self.store().await;
        let task = find_todo(&store, &params.id)?.task.clone();
        let removed = store.remove_todo(&params.id).map_err(tool_error)?;

        let message = if removed == 1 {
            format!("Removed todo '{task}'")
        } else {
            format!("Removed {removed} todos with ID '{}'", params.id)
        };
        text(OperationStatus::success(message).to_string())
    }

    #[tool(
        name = "project_context",
        description = "Return a project as pretty-printed JSON, suitable as context for an assistant conversation. Defaults to the active project."
    )]
    async fn project_context(&self, Parameters(params): Parameters<ProjectParams>) -> McpResult {
        debug!("project_context: {params:?}");

        let store = self.store().await;
        let id = target_project(&store, params.project_id.as_deref())?.id.clone();
        let context = store.assistant_context(&id).map_err(tool_error)?;
        text(context)
    }

    #[tool(
        name = "list_history",
        description = "List saved generations, newest first, with their prompts and tags."
    )]
    async fn list_history(&self) -> McpResult {
        debug!("list_history");

        let entries = self.history.lock().await.list().map_err(tool_error)?;
        text(HistoryList::with_title(&entries, "History").to_string())
    }

    #[tool(
        name = "show_history",
        description = "Show one saved generation with the todos it produced."
    )]
    async fn show_history(&self, Parameters(params): Parameters<HistoryId>) -> McpResult {
        debug!("show_history: {params:?}");

        let entry = self
            .history
            .lock()
            .await
            .get(params.id)
            .map_err(tool_error)?
            .ok_or_else(|| tool_error(StoreError::HistoryNotFound { id: params.id }))?;
        let todos: Vec<&Todo> = entry.todos.iter().collect();
        text(format!(
            "{entry}{}",
            TodoList::with_title(&todos, "Generated todos")
        ))
    }

    #[tool(
        name = "search_history",
        description = "Search saved generations. The query is matched case-insensitively against prompts, todo tasks, and categories."
    )]
    async fn search_history(&self, Parameters(params): Parameters<SearchHistory>) -> McpResult {
        debug!("search_history: {params:?}");

        let entries = self
            .history
            .lock()
            .await
            .search(&params.query)
            .map_err(tool_error)?;
        let title = format!("History matching \"{}\"", params.query);
        text(HistoryList::with_title(&entries, &title).to_string())
    }

    #[tool(
        name = "remove_history",
        description = "Delete a saved generation. Projects built from it are not affected."
    )]
    async fn remove_history(&self, Parameters(params): Parameters<HistoryId>) -> McpResult {
        debug!("remove_history: {params:?}");

        let entry = self
            .history
            .lock()
            .await
            .remove(params.id)
            .map_err(tool_error)?;
        text(DeleteResult::new(entry).to_string())
    }
}

fn target_project<'a>(store: &'a ProjectStore, id: Option<&str>) -> Result<&'a Project, ErrorData> {
    match id {
        Some(id) => store
            .get_project(id)
            .ok_or_else(|| tool_error(StoreError::project_not_found(id))),
        None => store.active_project().ok_or_else(|| {
            ErrorData::invalid_params(
                "No active project. Pass project_id or call select_project first",
                None,
            )
        }),
    }
}

fn find_todo<'a>(store: &'a ProjectStore, id: &str) -> Result<&'a Todo, ErrorData> {
    store
        .get_todo_by_id(id)
        .ok_or_else(|| tool_error(StoreError::todo_not_found(id)))
}

/// A trailing note when several projects hold a todo with this ID.
fn shared_note(store: &ProjectStore, todo_id: &str) -> String {
    let owners = store.todo_owners(todo_id);
    if owners.len() > 1 {
        format!(
            "\n⚠ Todo ID '{todo_id}' exists in {} projects ({}); all copies are affected.\n",
            owners.len(),
            owners.join(", ")
        )
    } else {
        String::new()
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for TaskdeckMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "taskdeck".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(r#"Taskdeck keeps projects of AI-generated todos.

## Core Concepts
- **Projects**: A named goal with a description, the prompt it came from, and an ordered list of todos
- **Todos**: A task with explanation, category, priority, difficulty, optional time estimate, dependencies, and notes
- **Active project**: Tools with an optional project_id use the active project when it is omitted
- **History**: Every batch added with `add_todos` is also saved as a history entry

## Workflow
1. `create_project` or `select_project` to choose where todos go
2. `add_todos` with the generated batch
3. `ready_todos` to find work whose dependencies are done
4. `toggle_todo` and `update_todo_notes` while working
5. `regenerate_todo` to replace a todo's generated fields
6. `project_context` to hand a whole project to an assistant as JSON

## Todo IDs
Todo tools look todos up by ID across every project. If the same ID appears in several projects, every copy is changed and the result says so."#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: TaskdeckMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting taskdeck MCP server on stdio");

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
