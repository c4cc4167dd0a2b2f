//! Collection wrapper types for displaying groups of domain objects.

use std::{collections::BTreeMap, fmt};

use crate::models::{Equipment, PlanSummary, Recipe, ShoppingListItem};

/// Newtype wrapper for displaying the plan catalogue.
///
/// # Examples
///
/// ```rust
/// use batchmaster_core::{display::PlanSummaries, models::PlanSummary};
///
/// let plans = PlanSummaries(vec![PlanSummary {
///     id: "spring".to_string(),
///     title: "Spring week".to_string(),
///     ..Default::default()
/// }]);
/// assert!(plans.to_string().contains("Spring week"));
/// assert_eq!(PlanSummaries(vec![]).to_string(), "No plans found.\n");
/// ```
pub struct PlanSummaries(pub Vec<PlanSummary>);

impl PlanSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanSummary> {
        self.0.iter()
    }
}

impl IntoIterator for PlanSummaries {
    type Item = PlanSummary;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for PlanSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }
        for plan in &self.0 {
            write!(f, "{plan}")?;
        }
        Ok(())
    }
}

/// Shopping list grouped by category, categories in alphabetical order and
/// items in list order.
pub struct ShoppingList<'a>(pub &'a [ShoppingListItem]);

impl fmt::Display for ShoppingList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "Shopping list is empty.");
        }

        let mut groups: BTreeMap<&str, Vec<&ShoppingListItem>> = BTreeMap::new();
        for item in self.0 {
            let category = if item.category.is_empty() {
                "Other"
            } else {
                item.category.as_str()
            };
            groups.entry(category).or_default().push(item);
        }

        let checked = self.0.iter().filter(|item| item.is_checked).count();
        writeln!(f, "# Shopping list ({checked}/{})", self.0.len())?;
        for (category, items) in groups {
            writeln!(f)?;
            writeln!(f, "## {category}")?;
            writeln!(f)?;
            for item in items {
                write!(f, "{item}")?;
            }
        }
        Ok(())
    }
}

/// Kitchen equipment needed for the session.
pub struct EquipmentList<'a>(pub &'a [Equipment]);

impl fmt::Display for EquipmentList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No equipment listed.");
        }
        writeln!(f, "# Equipment ({})", self.0.len())?;
        writeln!(f)?;
        for item in self.0 {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Recipes of a plan in document order.
pub struct RecipeList<'a>(pub &'a [Recipe]);

impl fmt::Display for RecipeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No recipes in this plan.");
        }
        writeln!(f, "# Recipes ({})", self.0.len())?;
        writeln!(f)?;
        for recipe in self.0 {
            write!(f, "{recipe}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quantity;

    #[test]
    fn test_shopping_list_groups_by_category() {
        let mut flour = ShoppingListItem::custom("a", "Flour", Quantity::Number(1.0), "kg");
        flour.category = "Dry goods".to_string();
        let mut milk = ShoppingListItem::custom("b", "Milk", Quantity::Number(1.0), "l");
        milk.category = "Dairy".to_string();
        milk.is_checked = true;

        let items = [flour, milk];
        let output = ShoppingList(&items).to_string();

        assert!(output.starts_with("# Shopping list (1/2)"));
        let dairy = output.find("## Dairy").expect("dairy heading");
        let dry = output.find("## Dry goods").expect("dry heading");
        assert!(dairy < dry);
    }

    #[test]
    fn test_empty_shopping_list() {
        assert_eq!(ShoppingList(&[]).to_string(), "Shopping list is empty.\n");
    }

    #[test]
    fn test_equipment_and_recipe_lists() {
        let equipment = [Equipment {
            name: "Oven".to_string(),
            description: String::new(),
        }];
        let output = EquipmentList(&equipment).to_string();
        assert!(output.starts_with("# Equipment (1)"));
        assert!(output.contains("- **Oven**\n"));

        let recipes = [Recipe {
            id: "r1".to_string(),
            name: "Soup".to_string(),
            ..Default::default()
        }];
        assert!(RecipeList(&recipes).to_string().contains("## Soup (ID: r1)"));
    }

    #[test]
    fn test_empty_equipment_and_recipe_lists() {
        assert_eq!(EquipmentList(&[]).to_string(), "No equipment listed.\n");
        assert_eq!(RecipeList(&[]).to_string(), "No recipes in this plan.\n");
    }
}
