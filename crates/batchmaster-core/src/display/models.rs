//! Display implementations for domain models.

use std::fmt;

use crate::models::{Equipment, PlanSummary, Recipe, ShoppingListItem, TimerState};

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerState::Running => write!(f, "➤ Running"),
            TimerState::Paused => write!(f, "‖ Paused"),
        }
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let badge = match (self.is_new, self.is_premium) {
            (true, true) => " *(new, premium)*",
            (true, false) => " *(new)*",
            (false, true) => " *(premium)*",
            (false, false) => "",
        };
        writeln!(f, "## {} (ID: {}){badge}", self.title, self.id)?;
        writeln!(f)?;

        if !self.description.is_empty() {
            writeln!(f, "- **Description**: {}", self.description)?;
        }
        if !self.time_estimate.is_empty() {
            writeln!(f, "- **Time**: {}", self.time_estimate)?;
        }
        if self.recipe_count > 0 {
            writeln!(f, "- **Recipes**: {}", self.recipe_count)?;
        }
        if !self.tags.is_empty() {
            writeln!(f, "- **Tags**: {}", self.tags.join(", "))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for ShoppingListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.is_checked { "✓" } else { "○" };
        write!(f, "- {check} {} {}", self.quantity, self.unit)?;
        write!(f, " **{}** `{}`", self.name, self.id)?;
        if !self.notes.is_empty() {
            write!(f, " ({})", self.notes)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- **{}**", self.name)?;
        if !self.description.is_empty() {
            write!(f, ": {}", self.description)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.name, self.id)?;
        writeln!(f)?;
        if self.servings > 0 {
            writeln!(f, "- **Servings**: {}", self.servings)?;
        }
        if !self.notes.is_empty() {
            writeln!(f, "- **Notes**: {}", self.notes)?;
        }

        if !self.ingredients.is_empty() {
            writeln!(f)?;
            writeln!(f, "### Ingredients")?;
            writeln!(f)?;
            for ingredient in &self.ingredients {
                write!(f, "- ")?;
                if !ingredient.portion.is_empty() {
                    write!(f, "{} ", ingredient.portion)?;
                }
                writeln!(f, "{}", ingredient.description)?;
            }
        }

        if !self.instructions.is_empty() {
            writeln!(f)?;
            writeln!(f, "### Steps")?;
            writeln!(f)?;
            for (number, step) in self.instructions.iter().enumerate() {
                writeln!(f, "{}. {step}", number + 1)?;
            }
        }
        writeln!(f)
    }
}
