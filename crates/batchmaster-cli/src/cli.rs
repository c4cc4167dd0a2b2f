//! Command handlers.
//!
//! Each command runs against a hydrated [`CookingSession`] and the
//! [`SelectionStore`] sharing its store, then renders a markdown view.

use std::{fmt::Write as _, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use batchmaster_core::{
    display::{
        EquipmentList, OperationStatus, PhaseOverview, PlanSummaries, ProgressBar, RecipeList,
        ShoppingList, TaskChecklist, TimerBoard,
    },
    models::PlanDocument,
    Clock, CookingSession, PhaseTask, SelectionStore, SessionEvent, SessionState, SystemClock,
};
use log::debug;
use tokio::sync::broadcast::error::RecvError;

use crate::{
    args::{
        AddTimeArgs, CheckArgs, PhaseArgs, SelectArgs, StartTimerArgs, TaskArgs, TimerCommands,
        TimerIdArgs, WatchArgs,
    },
    renderer::TerminalRenderer,
};

const NO_PLAN_HINT: &str = "No active plan. Pick one with `bm plans` and `bm select <id>`.";

pub struct Cli {
    session: CookingSession,
    selection: SelectionStore,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(
        session: CookingSession,
        selection: SelectionStore,
        renderer: TerminalRenderer,
    ) -> Self {
        Self {
            session,
            selection,
            renderer,
        }
    }

    pub async fn list_plans(&self) -> Result<()> {
        let plans = self
            .session
            .provider()
            .fetch_plans_summary()
            .await
            .context("Failed to fetch plans")?;
        self.renderer
            .render(&format!("# Plans\n\n{}", PlanSummaries(plans)))
    }

    /// Converges the session on a plan and records it in the selection
    /// store. A plan that cannot be loaded leaves both stores untouched.
    pub async fn select(&self, args: SelectArgs) -> Result<()> {
        self.session
            .reconcile(Some(&args.id))
            .await
            .with_context(|| format!("Failed to select plan '{}'", args.id))?;
        self.selection.set_selected_plan(Some(&args.id)).await;
        self.show_status()
    }

    pub fn show_status(&self) -> Result<()> {
        let state = self.session.view();
        let Some(plan_id) = state.active_plan_id.as_deref() else {
            return self.renderer.render(&format!("{NO_PLAN_HINT}\n"));
        };

        let mut out = String::new();
        writeln!(out, "# Plan {plan_id}")?;
        writeln!(out)?;
        if let Some(error) = &state.error {
            writeln!(out, "{}", OperationStatus::failure(error.clone()))?;
        }
        if let Some(doc) = state.plan_data.as_deref() {
            if doc.meta.week > 0 {
                writeln!(out, "- **Week**: {}", doc.meta.week)?;
            }
            if !doc.plan.duration.is_empty() {
                writeln!(out, "- **Duration**: {}", doc.plan.duration)?;
            }
            writeln!(
                out,
                "- **Progress**: {}",
                ProgressBar::new(self.session.calculate_progress())
            )?;
        }
        if let Some(phase) = self.session.current_phase() {
            writeln!(out, "- **Current phase**: {}. {}", phase.num, phase.name)?;
        }
        let running = state.timers.iter().filter(|t| !t.is_paused && !t.expired).count();
        if !state.timers.is_empty() {
            writeln!(out, "- **Timers**: {} ({running} running)", state.timers.len())?;
        }
        self.renderer.render(&out)
    }

    pub fn show_phases(&self) -> Result<()> {
        let state = self.require_plan()?;
        self.renderer.render(&PhaseOverview(&state).to_string())
    }

    pub async fn set_phase(&self, args: PhaseArgs) -> Result<()> {
        self.require_plan()?;
        if !self.session.get_all_phases().iter().any(|p| p.num == args.num) {
            bail!("Unknown phase '{}'", args.num);
        }
        self.session.set_phase(&args.num).await;
        self.show_tasks()
    }

    pub fn show_tasks(&self) -> Result<()> {
        let state = self.require_plan()?;
        self.renderer.render(&TaskChecklist(&state).to_string())
    }

    pub async fn complete_task(&self, args: TaskArgs) -> Result<()> {
        let task = self.find_task(&args.id)?;
        let message = if self.session.complete_task(&args.id).await {
            format!("Done: {}", task.task.instruction)
        } else {
            format!("Already done: {}", task.task.instruction)
        };
        self.render_status_with_progress(OperationStatus::success(message))
    }

    pub async fn uncomplete_task(&self, args: TaskArgs) -> Result<()> {
        let task = self.find_task(&args.id)?;
        let message = if self.session.uncomplete_task(&args.id).await {
            format!("Not done: {}", task.task.instruction)
        } else {
            format!("Was not done: {}", task.task.instruction)
        };
        self.render_status_with_progress(OperationStatus::success(message))
    }

    pub async fn handle_timer_command(&self, command: TimerCommands) -> Result<()> {
        match command {
            TimerCommands::Start(StartTimerArgs {
                name,
                seconds,
                recipe,
            }) => {
                let id = self
                    .session
                    .start_timer(&name, seconds, recipe.as_deref())
                    .await;
                self.render_timer_result(format!("Started timer {id}"))
            }
            TimerCommands::Task(TaskArgs { id }) => {
                let task = self.find_task(&id)?;
                let timer_id = self
                    .session
                    .start_task_timer(&task)
                    .await
                    .ok_or_else(|| anyhow!("Task {id} has no duration to time"))?;
                self.render_timer_result(format!("Started timer {timer_id}"))
            }
            TimerCommands::Pause(TimerIdArgs { id }) => {
                if !self.session.pause_timer(&id).await {
                    bail!("No running timer '{id}'");
                }
                self.render_timer_result(format!("Paused timer {id}"))
            }
            TimerCommands::Resume(TimerIdArgs { id }) => {
                if !self.session.resume_timer(&id).await {
                    bail!("No paused timer '{id}'");
                }
                self.render_timer_result(format!("Resumed timer {id}"))
            }
            TimerCommands::Cancel(TimerIdArgs { id }) => {
                if !self.session.cancel_timer(&id).await {
                    bail!("No timer '{id}'");
                }
                self.render_timer_result(format!("Cancelled timer {id}"))
            }
            TimerCommands::Add(AddTimeArgs { id, seconds }) => {
                if !self.session.add_time_to_timer(&id, seconds).await {
                    bail!("No timer '{id}'");
                }
                self.render_timer_result(format!("Added {seconds}s to timer {id}"))
            }
            TimerCommands::List => self.show_timers(),
        }
    }

    /// Redraws the timer board every tick and announces finished timers
    /// until Ctrl-C.
    pub async fn watch(&self, args: WatchArgs) -> Result<()> {
        let mut events = self.session.subscribe();
        let _ticker = self.session.spawn_ticker();

        // Timers that ran out while nobody was watching are announced first
        self.session.tick().await;
        self.show_timers()?;
        while let Ok(event) = events.try_recv() {
            if let SessionEvent::TimerExpired { name, .. } = event {
                self.announce_done(&name)?;
            }
        }
        if args.exit_when_done && !self.any_counting() {
            return Ok(());
        }

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(SessionEvent::Tick) => {
                        self.renderer.clear()?;
                        self.show_timers()?;
                    }
                    Ok(SessionEvent::TimerExpired { name, .. }) => {
                        self.announce_done(&name)?;
                        if args.exit_when_done && !self.any_counting() {
                            return Ok(());
                        }
                    }
                    Ok(other) => debug!("Ignoring event {other:?}"),
                    Err(RecvError::Lagged(skipped)) => debug!("Skipped {skipped} events"),
                    Err(RecvError::Closed) => return Ok(()),
                },
                _ = tokio::signal::ctrl_c() => return Ok(()),
            }
        }
    }

    pub fn show_shopping(&self) -> Result<()> {
        self.load_shopping_list()?;
        let state = self.selection.state();
        self.renderer.render(&ShoppingList(&state.ingredients).to_string())
    }

    pub async fn check_ingredient(&self, args: CheckArgs) -> Result<()> {
        self.load_shopping_list()?;
        if !self.selection.toggle_ingredient(&args.id).await {
            bail!("No ingredient '{}' on the shopping list", args.id);
        }
        let state = self.selection.state();
        self.renderer.render(&ShoppingList(&state.ingredients).to_string())
    }

    pub fn show_equipment(&self) -> Result<()> {
        let doc = self.require_document()?;
        self.selection.load_equipment_from_plan(&doc.equipment);
        let state = self.selection.state();
        self.renderer.render(&EquipmentList(&state.equipment).to_string())
    }

    pub fn show_recipes(&self) -> Result<()> {
        let doc = self.require_document()?;
        self.selection.load_recipes_from_plan(&doc.recipes);
        let state = self.selection.state();
        self.renderer.render(&RecipeList(&state.recipes).to_string())
    }

    /// Clears the selection; the session follows by dropping all progress.
    pub async fn reset(&self) -> Result<()> {
        self.selection.clear_plan_data().await;
        self.session
            .reconcile(None)
            .await
            .context("Failed to clear the active plan")?;
        self.renderer.render(
            &OperationStatus::success("Cleared the active plan and its progress".to_string())
                .to_string(),
        )
    }

    fn show_timers(&self) -> Result<()> {
        let timers = self.session.timers();
        self.renderer
            .render(&TimerBoard::new(&timers, SystemClock.now()).to_string())
    }

    fn announce_done(&self, name: &str) -> Result<()> {
        self.renderer
            .render(&OperationStatus::success(format!("Timer done: {name}")).to_string())
    }

    fn any_counting(&self) -> bool {
        self.session
            .timers()
            .iter()
            .any(|timer| !timer.is_paused && !timer.expired)
    }

    fn render_timer_result(&self, message: String) -> Result<()> {
        let timers = self.session.timers();
        self.renderer.render(&format!(
            "{}\n{}",
            OperationStatus::success(message),
            TimerBoard::new(&timers, SystemClock.now())
        ))
    }

    fn render_status_with_progress(&self, status: OperationStatus) -> Result<()> {
        self.renderer.render(&format!(
            "{status}\nProgress: {}\n",
            ProgressBar::new(self.session.calculate_progress())
        ))
    }

    fn load_shopping_list(&self) -> Result<()> {
        let doc = self.require_document()?;
        self.selection.load_from_document(&doc);
        Ok(())
    }

    fn require_document(&self) -> Result<Arc<PlanDocument>> {
        self.session.plan_data().ok_or_else(|| anyhow!(NO_PLAN_HINT))
    }

    fn require_plan(&self) -> Result<SessionState> {
        let state = self.session.view();
        if state.plan_data.is_none() {
            bail!(NO_PLAN_HINT);
        }
        Ok(state)
    }

    fn find_task(&self, id: &str) -> Result<PhaseTask> {
        self.require_plan()?;
        self.session
            .get_all_phases()
            .iter()
            .flat_map(|phase| phase.tasks())
            .find(|task| task.id.as_str() == id)
            .ok_or_else(|| anyhow!("Unknown task '{id}'"))
    }
}
