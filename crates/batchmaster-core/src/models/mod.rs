//! Data models for plan documents, timers and shopping lists.
//!
//! Display implementations for these models live in [`crate::display`] so
//! the data structures stay free of presentation logic.
//!
//! # Examples
//!
//! ```rust
//! use batchmaster_core::models::{Phase, Section, Task};
//!
//! let phase = Phase {
//!     num: "1".to_string(),
//!     name: "Prep".to_string(),
//!     sections: vec![Section {
//!         name: "Vegetables".to_string(),
//!         tasks: vec![Task {
//!             time: "10min".to_string(),
//!             instruction: "Dice the onions".to_string(),
//!             ..Default::default()
//!         }],
//!     }],
//!     ..Default::default()
//! };
//!
//! let tasks = phase.tasks();
//! assert_eq!(tasks[0].id.as_str(), "1/0/0");
//! assert_eq!(tasks[0].task.timer_seconds(), Some(600));
//! ```

pub mod document;
pub mod shopping;
pub mod summary;
pub mod task_id;
pub mod timer;


pub use document::{
    BatchPlan, Equipment, Ingredient, Meta, Phase, PlanDocument, Quantity, Recipe,
    RecipeIngredient, Section, Task,
};
pub use shopping::ShoppingListItem;
pub use summary::PlanSummary;
pub use task_id::{PhaseTask, TaskId};
pub use timer::{Timer, TimerState};
