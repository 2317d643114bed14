use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    quantity::Quantity,
    schema::{Ingredient, Recipe},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    /// No ingredients paired at all.
    Empty,
    Ready,
    Incomplete,
}

impl Readiness {
    pub fn classify(total_count: usize, available_count: usize) -> Self {
        match total_count {
            0 => Readiness::Empty,
            n if n == available_count => Readiness::Ready,
            _ => Readiness::Incomplete,
        }
    }

    pub fn of<'a, I>(pairings: I) -> Self
    where
        I: IntoIterator<Item = &'a Ingredient>,
    {
        let (total, available) = pairings
            .into_iter()
            .fold((0, 0), |(total, available), ingredient| {
                (total + 1, available + usize::from(is_available(ingredient)))
            });
        Self::classify(total, available)
    }

    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            Readiness::Empty => Some("incomplete_recipe"),
            Readiness::Ready => Some("ready_recipe"),
            Readiness::Incomplete => None,
        }
    }
}

pub fn is_in_stock(ingredient: &Ingredient) -> bool {
    ingredient
        .amount_in_pantry
        .as_ref()
        .is_some_and(Quantity::is_positive)
}

/// A paired ingredient is available when the pantry holds at least what the
/// recipe asks for. Presence alone is not enough.
pub fn is_available(ingredient: &Ingredient) -> bool {
    match &ingredient.amount_in_pantry {
        Some(pantry) if pantry.is_positive() => match &ingredient.amount_in_recipe {
            Some(required) => pantry >= required,
            None => true,
        },
        _ => false,
    }
}

/// Splits a pantry into (in stock, out of stock), keeping relative order.
pub fn partition_pantry(ingredients: Vec<Ingredient>) -> (Vec<Ingredient>, Vec<Ingredient>) {
    ingredients.into_iter().partition(is_in_stock)
}

/// Splits a recipe's pairings into (available, missing), keeping relative order.
pub fn partition_pairings(pairings: Vec<Ingredient>) -> (Vec<Ingredient>, Vec<Ingredient>) {
    pairings.into_iter().partition(is_available)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MadeRecipe {
    pub recipe: Recipe,
    /// Only the pairings whose pantry amount actually changed.
    pub consumed: Vec<Ingredient>,
}

/// Consumes every available ingredient line from the pantry and stamps the
/// recipe with `today`. Lines that are not available are left alone; the date
/// is set either way.
pub fn mark_as_made(recipe: &Recipe, pairings: &[Ingredient], today: NaiveDate) -> MadeRecipe {
    let mut recipe = recipe.clone();
    recipe.date_last_made = Some(today);

    let consumed = pairings
        .iter()
        .filter(|ingredient| is_available(ingredient))
        .filter_map(|ingredient| {
            let required = ingredient.amount_in_recipe.as_ref()?;
            let pantry = ingredient.amount_in_pantry.as_ref()?;

            let mut updated = ingredient.clone();
            updated.set_amount_in_pantry(Some(pantry - required));
            Some(updated)
        })
        .collect();

    MadeRecipe { recipe, consumed }
}
