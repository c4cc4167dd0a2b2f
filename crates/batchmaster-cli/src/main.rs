//! Batchmaster CLI Application
//!
//! Command-line companion for batch-cooking sessions.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use batchmaster_core::{SelectionStore, SessionBuilder};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let settings = args.settings()?;

    let session = SessionBuilder::new()
        .with_settings(settings)
        .build()
        .await
        .context("Failed to initialize cooking session")?;

    let selection = SelectionStore::new(session.store());
    selection.hydrate().await;

    let renderer = TerminalRenderer::new(!args.no_color);
    let cli = Cli::new(session, selection, renderer);

    info!("Batchmaster started");

    match args.command {
        Some(Plans) => cli.list_plans().await,
        Some(Select(select)) => cli.select(select).await,
        Some(Status) | None => cli.show_status(),
        Some(Phases) => cli.show_phases(),
        Some(Phase(phase)) => cli.set_phase(phase).await,
        Some(Tasks) => cli.show_tasks(),
        Some(Done(task)) => cli.complete_task(task).await,
        Some(Undo(task)) => cli.uncomplete_task(task).await,
        Some(Timer { command }) => cli.handle_timer_command(command).await,
        Some(Watch(watch)) => cli.watch(watch).await,
        Some(Shopping) => cli.show_shopping(),
        Some(Check(check)) => cli.check_ingredient(check).await,
        Some(Equipment) => cli.show_equipment(),
        Some(Recipes) => cli.show_recipes(),
        Some(Reset) => cli.reset().await,
    }
}
