//! Core library for the Batchmaster batch-cooking companion.
//!
//! This crate tracks a cooking session through a weekly batch-cooking plan:
//! which plan is active, the current phase, completed tasks and countdown
//! timers, persisted locally so progress survives restarts. Plan documents
//! come from a [`provider::PlanProvider`], optionally cached with offline
//! fallback.
//!
//! # Components
//!
//! - [`CookingSession`]: the session engine, built with [`SessionBuilder`]
//! - [`SelectionStore`]: the plan being browsed and its shopping list; the
//!   session follows its selected id
//! - [`provider`]: HTTP and directory plan sources plus the cache wrapper
//! - [`storage`]: the key-value store both state owners persist to
//! - [`display`]: markdown views for terminal rendering
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use batchmaster_core::{
//!     provider::DirectoryPlanProvider, storage::MemoryStore, SelectionStore, SessionBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let session = SessionBuilder::new()
//!     .with_store(store.clone())
//!     .with_provider(Arc::new(DirectoryPlanProvider::new("plans")))
//!     .build()
//!     .await?;
//!
//! // The session follows whatever plan the selection store points at
//! let selection = SelectionStore::new(store);
//! selection.hydrate().await;
//! let sync = session.spawn_selection_sync(selection.subscribe());
//! selection.set_selected_plan(Some("spring")).await;
//!
//! let ticker = session.spawn_ticker();
//! let timer = session.start_timer("Boil water", 600, None).await;
//! println!("{}s left", session.get_timer_remaining_seconds(&timer));
//! # drop((sync, ticker));
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod provider;
pub mod selection;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Settings;
pub use db::Database;
pub use display::{
    Countdown, EquipmentList, OperationStatus, PhaseOverview, PlanSummaries, ProgressBar,
    RecipeList, ShoppingList, TaskChecklist, TimerBoard,
};
pub use error::{Result, SessionError};
pub use models::{
    Phase, PhaseTask, PlanDocument, PlanSummary, ShoppingListItem, Task, TaskId, Timer,
    TimerState,
};
pub use provider::{fetch_plan, PlanProvider, PlanRef};
pub use selection::{SelectedPlan, SelectionState, SelectionStore};
pub use session::{CookingSession, SessionBuilder, SessionEvent, SessionState, TickerHandle};
pub use storage::KeyValueStore;
