//! taskdeck CLI Application
//!
//! Command-line interface and MCP server for the taskdeck project store.

mod args;
mod cli;
mod handler;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use handler::Cli;
use log::info;
use mcp::{run_stdio_server, TaskdeckMcpServer};
use renderer::TerminalRenderer;
use taskdeck_core::{
    store::{default_database_path, prepare_database_path},
    HistoryLog, ProjectStoreBuilder,
};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let db_path = match database_file {
        Some(path) => prepare_database_path(path),
        None => default_database_path(),
    }
    .context("Failed to resolve database path")?;

    let store = ProjectStoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .context("Failed to initialize project store")?;
    let history = HistoryLog::open(&db_path).context("Failed to open generation history")?;

    info!("taskdeck started with {}", db_path.display());

    if let Some(Serve) = command {
        info!("Starting taskdeck MCP server");
        let server = TaskdeckMcpServer::new(store, history);
        run_stdio_server(server.clone())
            .await
            .context("MCP server failed")?;
        return server.flush().await.context("Failed to save project state");
    }

    let mut cli = Cli::new(store, history, TerminalRenderer::new(!no_color));
    let outcome = match command {
        Some(Project { command }) => cli.handle_project_command(command),
        Some(Todo { command }) => cli.handle_todo_command(command),
        Some(History { command }) => cli.handle_history_command(command),
        Some(Serve) | None => cli.show_home(),
    };
    let flushed = cli.finish();

    outcome.and(flushed)
}
