//! Cooking session engine.
//!
//! A [`CookingSession`] tracks progress through one batch-cooking plan: which
//! plan is active, the current phase, completed tasks and running timers. It
//! is the single in-memory source of truth; every mutation persists the
//! affected slice to the shared [`KeyValueStore`].
//!
//! # Lifecycle
//!
//! ```text
//!   build() ──▶ hydrate ──▶ is_initialized ──▶ activate / reconcile ...
//!                 │                                  │
//!                 └── storage reads (fail open)      └── persist per slice
//! ```
//!
//! Nothing is written and no plan is loaded before hydration completes, so
//! an early empty write can never clobber a snapshot that is still being
//! read.
//!
//! ## Submodules
//!
//! - [`builder`]: assembles a session from settings and hydrates it
//! - `lifecycle`: hydration, activation and deactivation
//! - `tasks`: completion, phases and progress
//! - `timers`: the per-timer state machine and expiry
//! - `sync_selection`: one-directional sync from the selection store
//! - `ticker`: the 1 second background tick
//!
//! # Examples
//!
//! ```rust
//! use batchmaster_core::{SessionBuilder, storage::MemoryStore};
//! # use batchmaster_core::provider::DirectoryPlanProvider;
//! # use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = SessionBuilder::new()
//!     .with_store(Arc::new(MemoryStore::new()))
//!     .with_provider(Arc::new(DirectoryPlanProvider::new("plans")))
//!     .build()
//!     .await?;
//!
//! session.activate_plan("spring").await?;
//! for task in session.get_current_phase_tasks() {
//!     println!("{} {}", task.id, task.task.instruction);
//! }
//! println!("{}% done", session.calculate_progress());
//! # Ok(())
//! # }
//! ```

use std::{
    collections::BTreeSet,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use jiff::Timestamp;
use tokio::sync::{self, broadcast};

use crate::{
    clock::Clock,
    models::{PlanDocument, Timer},
    provider::PlanProvider,
    storage::KeyValueStore,
};

pub mod builder;
mod lifecycle;
mod persist;
mod sync_selection;
mod tasks;
mod ticker;
mod timers;


pub use builder::SessionBuilder;
pub use ticker::{TickerHandle, TICK_INTERVAL};

const EVENT_CAPACITY: usize = 64;

/// Everything the session knows, as one plain value.
///
/// [`CookingSession::view`] hands out clones of this for rendering.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub active_plan_id: Option<String>,
    /// Document of the active plan, once fetched
    pub plan_data: Option<Arc<PlanDocument>>,
    /// A plan fetch is in flight
    pub is_loading: bool,
    /// User-facing message of the last failed load
    pub error: Option<String>,
    pub current_phase_id: Option<String>,
    pub completed_task_ids: BTreeSet<String>,
    pub timers: Vec<Timer>,
    /// Hydration from storage has finished
    pub is_initialized: bool,
}

/// Notifications broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    PlanActivated { plan_id: String },
    PlanCleared,
    /// A running timer reached zero; sent once per timer
    TimerExpired { timer_id: String, name: String },
    /// Periodic tick while at least one timer is running
    Tick,
}

/// Handle to a cooking session. Clones share the same session.
#[derive(Clone)]
pub struct CookingSession {
    pub(crate) inner: Arc<SessionInner>,
}

pub(crate) struct SessionInner {
    state: Mutex<SessionState>,
    store: Arc<dyn KeyValueStore>,
    provider: Arc<dyn PlanProvider>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<SessionEvent>,
    /// Serializes persistence writes
    write_gate: sync::Mutex<()>,
    /// Latest plan request; older fetch results are discarded
    fetch_generation: AtomicU64,
    timer_seq: AtomicU64,
}

impl CookingSession {
    /// Creates an empty, not yet hydrated session.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn PlanProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(SessionState::default()),
                store,
                provider,
                clock,
                events,
                write_gate: sync::Mutex::new(()),
                fetch_generation: AtomicU64::new(0),
                timer_seq: AtomicU64::new(0),
            }),
        }
    }

    /// Snapshot of the full session state.
    pub fn view(&self) -> SessionState {
        self.state().clone()
    }

    pub fn active_plan_id(&self) -> Option<String> {
        self.state().active_plan_id.clone()
    }

    pub fn plan_data(&self) -> Option<Arc<PlanDocument>> {
        self.state().plan_data.clone()
    }

    pub fn current_phase_id(&self) -> Option<String> {
        self.state().current_phase_id.clone()
    }

    pub fn completed_task_ids(&self) -> BTreeSet<String> {
        self.state().completed_task_ids.clone()
    }

    pub fn timers(&self) -> Vec<Timer> {
        self.state().timers.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.state().is_initialized
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// The store this session persists to. The selection store shares it.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.inner.store)
    }

    pub fn provider(&self) -> Arc<dyn PlanProvider> {
        Arc::clone(&self.inner.provider)
    }

    pub(crate) fn now(&self) -> Timestamp {
        self.inner.clock.now()
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.state()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        // No receivers is fine
        let _ = self.inner.events.send(event);
    }

    pub(crate) fn next_generation(&self) -> u64 {
        self.inner.fetch_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn is_latest_generation(&self, generation: u64) -> bool {
        self.inner.fetch_generation.load(Ordering::SeqCst) == generation
    }

    pub(crate) fn next_timer_seq(&self) -> u64 {
        self.inner.timer_seq.fetch_add(1, Ordering::SeqCst)
    }
}

impl SessionInner {
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
