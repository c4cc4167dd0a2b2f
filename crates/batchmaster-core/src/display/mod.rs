//! Display formatting for plans, session state and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! views that combine several pieces of state are newtype wrappers. All
//! output is markdown, rendered by the CLI's terminal renderer or printed as
//! is.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  SessionState,  │    │    Wrappers     │    │    Markdown     │
//! │  PlanDocument   │───▶│ (PhaseOverview, │───▶│     output      │
//! │                 │    │  TimerBoard...) │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: [`PlanSummaries`], [`ShoppingList`], [`EquipmentList`]
//!   and [`RecipeList`]
//! - [`session`]: [`PhaseOverview`], [`TaskChecklist`], [`TimerBoard`] and
//!   [`ProgressBar`]
//! - [`status`]: [`OperationStatus`]
//! - [`countdown`]: `mm:ss` formatting
//! - [`models`]: Display implementations for domain models
//!
//! # Examples
//!
//! ```rust
//! use batchmaster_core::display::{Countdown, OperationStatus, ProgressBar};
//!
//! assert_eq!(Countdown(540).to_string(), "09:00");
//! assert!(ProgressBar::new(50).to_string().contains("50%"));
//!
//! let status = OperationStatus::success("Task 1/0/0 done".to_string());
//! assert!(status.to_string().starts_with("Success:"));
//! ```

pub mod collections;
pub mod countdown;
pub mod models;
pub mod session;
pub mod status;

pub use collections::{EquipmentList, PlanSummaries, RecipeList, ShoppingList};
pub use countdown::Countdown;
pub use session::{PhaseOverview, ProgressBar, TaskChecklist, TimerBoard};
pub use status::OperationStatus;
