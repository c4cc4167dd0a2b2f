//! Shopping list entries derived from plan ingredients.

use serde::{Deserialize, Serialize};

use super::{Ingredient, Quantity};

/// An ingredient on the user's shopping list, with its checkbox state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub id: String,
    pub category: String,
    pub name: String,
    pub quantity: Quantity,
    pub unit: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_name: Option<String>,
    /// Entered by hand rather than loaded from a plan
    #[serde(default)]
    pub custom_item: bool,
}

impl ShoppingListItem {
    /// Builds an unchecked list entry from a plan ingredient. Ingredients
    /// without an id get a positional one so toggling stays addressable.
    pub fn from_ingredient(ingredient: &Ingredient, index: usize) -> Self {
        let id = if ingredient.id.is_empty() {
            format!("ingredient-{index}")
        } else {
            ingredient.id.clone()
        };
        Self {
            id,
            category: ingredient.category.clone(),
            name: ingredient.name.clone(),
            quantity: ingredient.quantity.clone(),
            unit: ingredient.unit.clone(),
            notes: ingredient.notes.clone(),
            is_checked: false,
            recipe_id: ingredient.recipe.as_ref().map(ToString::to_string),
            recipe_name: None,
            custom_item: false,
        }
    }

    /// A hand-entered extra item.
    pub fn custom(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: Quantity,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category: "Extra".to_string(),
            name: name.into(),
            quantity,
            unit: unit.into(),
            notes: String::new(),
            is_checked: false,
            recipe_id: None,
            recipe_name: None,
            custom_item: true,
        }
    }
}
