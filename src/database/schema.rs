use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{error::TypeError, quantity::Quantity};

pub type Uuid = i32;

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub owning_user: Uuid,
    pub name: String,
    pub date_last_made: Option<NaiveDate>,
}

impl Recipe {
    pub fn new(id: Uuid, owning_user: Uuid, name: &str, date_last_made: Option<NaiveDate>) -> Self {
        Self {
            id,
            owning_user,
            name: name.trim().to_string(),
            date_last_made,
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    /// e.g. "October 17, 2026"
    pub fn formatted_date(&self) -> Option<String> {
        self.date_last_made
            .map(|date| date.format("%B %d, %Y").to_string())
    }
}

/// An ingredient in a user's pantry. `amount_in_recipe` is only meaningful
/// when the ingredient was loaded through a recipe pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub owning_user: Uuid,
    pub name: String,
    pub cost: Option<Quantity>,
    pub amount_in_pantry: Option<Quantity>,
    pub amount_in_recipe: Option<Quantity>,
}

impl Ingredient {
    pub fn new(
        id: Uuid,
        owning_user: Uuid,
        name: &str,
        cost: Option<Quantity>,
        amount_in_pantry: Option<Quantity>,
    ) -> Self {
        Self {
            id,
            owning_user,
            name: name.trim().to_string(),
            cost: cost.and_then(Quantity::normalized),
            amount_in_pantry: amount_in_pantry.and_then(Quantity::normalized),
            amount_in_recipe: None,
        }
    }

    pub fn with_amount_in_recipe(mut self, amount: Option<Quantity>) -> Self {
        self.set_amount_in_recipe(amount);
        self
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    pub fn set_cost(&mut self, cost: Option<Quantity>) {
        self.cost = cost.and_then(Quantity::normalized);
    }

    pub fn set_amount_in_pantry(&mut self, amount: Option<Quantity>) {
        self.amount_in_pantry = amount.and_then(Quantity::normalized);
    }

    pub fn set_amount_in_recipe(&mut self, amount: Option<Quantity>) {
        self.amount_in_recipe = amount.and_then(Quantity::normalized);
    }
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct IngredientRow {
    pub id: Uuid,
    pub owning_user: Uuid,
    pub name: String,
    pub cost: Option<String>,
    pub amount_in_pantry: Option<String>,
    #[sqlx(default)]
    pub amount_in_recipe: Option<String>,
}

fn stored_quantity(value: Option<String>) -> Result<Option<Quantity>, TypeError> {
    value.map(|v| Quantity::parse(&v)).transpose()
}

impl TryFrom<IngredientRow> for Ingredient {
    type Error = TypeError;

    fn try_from(row: IngredientRow) -> Result<Self, Self::Error> {
        Ok(Ingredient::new(
            row.id,
            row.owning_user,
            &row.name,
            stored_quantity(row.cost)?,
            stored_quantity(row.amount_in_pantry)?,
        )
        .with_amount_in_recipe(stored_quantity(row.amount_in_recipe)?))
    }
}

/// An ingredient as seen through one of the user's recipes.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PairingRow {
    pub recipe_id: Uuid,
    #[sqlx(flatten)]
    pub ingredient: IngredientRow,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub direction: String,
    pub notes: Option<String>,
}

impl Step {
    pub fn new(id: Uuid, recipe_id: Uuid, direction: &str, notes: Option<&str>) -> Self {
        let mut step = Self {
            id,
            recipe_id,
            direction: String::new(),
            notes: None,
        };
        step.set_direction(direction);
        step.set_notes(notes);
        step
    }

    pub fn set_direction(&mut self, direction: &str) {
        self.direction = direction.trim().to_string();
    }

    pub fn set_notes(&mut self, notes: Option<&str>) {
        self.notes = normalized_notes(notes);
    }

    /// Notes are written with literal `\n` separators.
    pub fn notes_lines(&self) -> Vec<&str> {
        self.notes
            .as_deref()
            .map(|notes| notes.split("\\n").collect())
            .unwrap_or_default()
    }
}

pub(crate) fn normalized_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|notes| !notes.is_empty())
        .map(str::to_string)
}
