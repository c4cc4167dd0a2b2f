//! Selection store: which plan the user is looking at, plus display
//! snapshots (shopping list, recipes, equipment) derived from it.
//!
//! The selected plan id and the ids of checked shopping list items are
//! persisted. The lists themselves are plain owned data loaded from a plan
//! document and can always be re-derived by fetching the plan again.
//!
//! Id changes are published on a [`watch`] channel as a [`SelectedPlan`].
//! The channel reads [`SelectedPlan::Pending`] until the store is hydrated
//! or a plan is picked explicitly, so subscribers never mistake a store
//! that has not been read yet for an empty selection. The cooking session
//! subscribes to it and this store never reads session state.

use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, MutexGuard},
};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::{self, watch};

use crate::{
    models::{Equipment, PlanDocument, Recipe, ShoppingListItem},
    storage::{keys, KeyValueStore},
};

const SNAPSHOT_VERSION: u32 = 2;
const EMPTY_SNAPSHOT: &str = r#"{"selectedPlanId":null,"checkedIngredientIds":[],"version":2}"#;

/// In-memory contents of the selection store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub selected_plan_id: Option<String>,
    pub ingredients: Vec<ShoppingListItem>,
    pub recipes: Vec<Recipe>,
    pub equipment: Vec<Equipment>,
    /// Checked shopping list ids; applied to ingredients as they load
    pub checked_ingredient_ids: BTreeSet<String>,
}

/// Value published to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectedPlan {
    /// The store has not been hydrated yet
    #[default]
    Pending,
    Ready(Option<String>),
}

impl SelectedPlan {
    pub fn plan_id(&self) -> Option<&str> {
        match self {
            SelectedPlan::Ready(id) => id.as_deref(),
            SelectedPlan::Pending => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SelectedPlan::Ready(_))
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionSnapshot {
    selected_plan_id: Option<String>,
    #[serde(default)]
    checked_ingredient_ids: BTreeSet<String>,
    #[serde(default)]
    version: u32,
}

pub struct SelectionStore {
    store: Arc<dyn KeyValueStore>,
    state: Mutex<SelectionState>,
    selected_tx: watch::Sender<SelectedPlan>,
    write_gate: sync::Mutex<()>,
}

impl SelectionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (selected_tx, _) = watch::channel(SelectedPlan::Pending);
        Self {
            store,
            state: Mutex::new(SelectionState::default()),
            selected_tx,
            write_gate: sync::Mutex::new(()),
        }
    }

    /// Restores the persisted selection. Unreadable snapshots are treated as
    /// "nothing selected". A no-op once the store is ready, so a selection
    /// made before hydration is not overwritten.
    pub async fn hydrate(&self) {
        if self.is_hydrated() {
            return;
        }

        let snapshot = match self.store.get(keys::PLAN_STORAGE).await {
            Ok(Some(raw)) => serde_json::from_str::<SelectionSnapshot>(&raw)
                .map_err(|e| warn!("Ignoring unreadable selection snapshot: {e}"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read selection snapshot: {e}");
                None
            }
        };
        let (selected, checked) = snapshot.map_or_else(Default::default, |snapshot| {
            (
                snapshot.selected_plan_id.filter(|id| !id.is_empty()),
                snapshot.checked_ingredient_ids,
            )
        });

        debug!("Selection hydrated: {selected:?}, {} checked", checked.len());
        {
            let mut state = self.lock();
            state.selected_plan_id = selected.clone();
            state.checked_ingredient_ids = checked;
        }
        self.publish(selected);
    }

    /// True once the persisted selection has been read or a plan was picked.
    pub fn is_hydrated(&self) -> bool {
        self.selected_tx.borrow().is_ready()
    }

    /// Subscribes to selected plan id changes.
    pub fn subscribe(&self) -> watch::Receiver<SelectedPlan> {
        self.selected_tx.subscribe()
    }

    pub fn selected_plan_id(&self) -> Option<String> {
        self.lock().selected_plan_id.clone()
    }

    /// Copy of the whole store.
    pub fn state(&self) -> SelectionState {
        self.lock().clone()
    }

    /// Records the plan being looked at (or none) and persists it. Empty ids
    /// count as none. Picking another plan forgets the checked items.
    pub async fn set_selected_plan(&self, plan_id: Option<&str>) {
        let plan_id = plan_id.filter(|id| !id.is_empty()).map(str::to_string);
        info!("Selecting plan {plan_id:?}");

        {
            let mut state = self.lock();
            if state.selected_plan_id != plan_id {
                state.checked_ingredient_ids.clear();
                for item in &mut state.ingredients {
                    item.is_checked = false;
                }
            }
            state.selected_plan_id = plan_id.clone();
        }
        self.persist().await;
        self.publish(plan_id);
    }

    /// Replaces the shopping list wholesale. Items whose id was checked
    /// before come back checked.
    pub fn load_ingredients_from_plan(&self, items: &[ShoppingListItem]) {
        debug!("Loading {} ingredients", items.len());
        let mut state = self.lock();
        let mut ingredients = items.to_vec();
        for item in &mut ingredients {
            item.is_checked |= state.checked_ingredient_ids.contains(&item.id);
        }
        state.ingredients = ingredients;
    }

    pub fn load_recipes_from_plan(&self, recipes: &[Recipe]) {
        debug!("Loading {} recipes", recipes.len());
        self.lock().recipes = recipes.to_vec();
    }

    pub fn load_equipment_from_plan(&self, equipment: &[Equipment]) {
        debug!("Loading {} equipment items", equipment.len());
        self.lock().equipment = equipment.to_vec();
    }

    /// Loads all three lists from a plan document.
    pub fn load_from_document(&self, document: &PlanDocument) {
        let items: Vec<ShoppingListItem> = document
            .ingredients
            .iter()
            .enumerate()
            .map(|(index, ingredient)| ShoppingListItem::from_ingredient(ingredient, index))
            .collect();

        self.load_ingredients_from_plan(&items);
        self.load_recipes_from_plan(&document.recipes);
        self.load_equipment_from_plan(&document.equipment);
    }

    /// Flips the checkbox of a shopping list item and persists the checked
    /// ids. Returns false for an unknown id.
    pub async fn toggle_ingredient(&self, id: &str) -> bool {
        {
            let mut state = self.lock();
            let Some(item) = state.ingredients.iter_mut().find(|item| item.id == id) else {
                debug!("Ignoring toggle of unknown ingredient '{id}'");
                return false;
            };
            item.is_checked = !item.is_checked;
            let checked = item.is_checked;

            if checked {
                state.checked_ingredient_ids.insert(id.to_string());
            } else {
                state.checked_ingredient_ids.remove(id);
            }
        }

        self.persist().await;
        true
    }

    /// Appends a user-entered extra item.
    pub fn add_ingredient(&self, item: ShoppingListItem) {
        self.lock().ingredients.push(item);
    }

    /// Resets the id and all three lists in one step and forgets the
    /// persisted selection.
    pub async fn clear_plan_data(&self) {
        info!("Clearing selected plan data");
        *self.lock() = SelectionState::default();

        {
            let _gate = self.write_gate.lock().await;
            if let Err(e) = self.store.remove(keys::PLAN_STORAGE).await {
                warn!("Failed to remove selection snapshot: {e}");
            }
        }
        self.publish(None);
    }

    async fn persist(&self) {
        let _gate = self.write_gate.lock().await;

        let snapshot = {
            let state = self.lock();
            SelectionSnapshot {
                selected_plan_id: state.selected_plan_id.clone(),
                checked_ingredient_ids: state.checked_ingredient_ids.clone(),
                version: SNAPSHOT_VERSION,
            }
        };
        let raw = serde_json::to_string(&snapshot).unwrap_or_else(|e| {
            warn!("Selection snapshot serialization failed, storing empty default: {e}");
            EMPTY_SNAPSHOT.to_string()
        });

        if let Err(e) = self.store.set(keys::PLAN_STORAGE, &raw).await {
            warn!("Failed to persist selection: {e}");
        }
    }

    fn publish(&self, plan_id: Option<String>) {
        let next = SelectedPlan::Ready(plan_id);
        self.selected_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn lock(&self) -> MutexGuard<'_, SelectionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
