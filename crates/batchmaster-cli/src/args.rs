//! Command-line arguments.
//!
//! clap structures live here; [`crate::cli::Cli`] turns them into calls on
//! the cooking session and the selection store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use batchmaster_core::Settings;
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Terminal companion for batch-cooking sessions
///
/// Pick a weekly plan, walk through its phases, tick off tasks and run
/// kitchen timers. Progress is saved locally and survives restarts.
#[derive(Parser)]
#[command(version, about, name = "bm")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/batchmaster/batchmaster.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Read plans from a local directory instead of the API
    #[arg(long, global = true)]
    pub plans_dir: Option<PathBuf>,

    /// Base URL of the plan API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Args {
    /// Environment settings overridden by command-line flags.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::from_env().context("Invalid environment configuration")?;
        if let Some(path) = &self.database_file {
            settings.database_path = Some(path.clone());
        }
        if let Some(dir) = &self.plans_dir {
            settings.plans_dir = Some(dir.clone());
        }
        if let Some(url) = &self.api_url {
            settings.api_url = url.clone();
        }
        Ok(settings)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available plans
    Plans,
    /// Select a plan and start cooking it
    ///
    /// Selecting a different plan than the active one starts a fresh
    /// session: completed tasks and timers are discarded.
    Select(SelectArgs),
    /// Show the active plan, current phase and progress
    #[command(alias = "st")]
    Status,
    /// List the phases of the active plan
    Phases,
    /// Switch to another phase
    Phase(PhaseArgs),
    /// Show the tasks of the current phase
    #[command(alias = "t")]
    Tasks,
    /// Mark a task as done
    Done(TaskArgs),
    /// Mark a task as not done
    Undo(TaskArgs),
    /// Manage kitchen timers
    Timer {
        #[command(subcommand)]
        command: TimerCommands,
    },
    /// Follow running timers, announcing each one as it finishes
    Watch(WatchArgs),
    /// Show the shopping list of the active plan
    Shopping,
    /// Tick or untick an item on the shopping list
    Check(CheckArgs),
    /// List the equipment the active plan needs
    Equipment,
    /// Show the recipes of the active plan
    Recipes,
    /// Stop cooking: clear the selected plan and all progress
    Reset,
}

#[derive(ClapArgs)]
pub struct SelectArgs {
    /// Plan id, or a week number
    pub id: String,
}

#[derive(ClapArgs)]
pub struct PhaseArgs {
    /// Phase number as shown by `bm phases`
    pub num: String,
}

#[derive(ClapArgs)]
pub struct TaskArgs {
    /// Task id as shown by `bm tasks`, e.g. 1/0/2
    pub id: String,
}

#[derive(ClapArgs)]
pub struct CheckArgs {
    /// Ingredient id as shown by `bm shopping`
    pub id: String,
}

#[derive(ClapArgs)]
pub struct WatchArgs {
    /// Exit once no timer is counting down instead of waiting for Ctrl-C
    #[arg(long)]
    pub exit_when_done: bool,
}

#[derive(Subcommand)]
pub enum TimerCommands {
    /// Start a timer
    #[command(alias = "s")]
    Start(StartTimerArgs),
    /// Start a timer for a task, using the task's duration
    Task(TaskArgs),
    /// Pause a running timer
    Pause(TimerIdArgs),
    /// Resume a paused timer
    Resume(TimerIdArgs),
    /// Remove a timer
    Cancel(TimerIdArgs),
    /// Add time to a timer
    Add(AddTimeArgs),
    /// List timers with their remaining time
    #[command(alias = "ls")]
    List,
}

#[derive(ClapArgs)]
pub struct StartTimerArgs {
    /// Label shown next to the countdown
    pub name: String,
    /// Duration in seconds
    pub seconds: u64,
    /// Recipe this timer belongs to
    #[arg(long)]
    pub recipe: Option<String>,
}

#[derive(ClapArgs)]
pub struct TimerIdArgs {
    /// Timer id as shown by `bm timer list`
    pub id: String,
}

#[derive(ClapArgs)]
pub struct AddTimeArgs {
    /// Timer id as shown by `bm timer list`
    pub id: String,
    /// Seconds to add
    pub seconds: u64,
}
