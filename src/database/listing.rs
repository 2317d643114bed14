use std::{cmp::Ordering, collections::HashMap};

use serde::{Deserialize, Serialize};

use super::{
    cost::{formatted_cost, formatted_line_cost, recipe_cost},
    pagination::{resolve_page, resolve_pages, DualPageRedirect, PageContext, PageRedirect},
    quantity::{formatted_amount, Quantity},
    schema::{Ingredient, Recipe, Step, Uuid},
    stock::{is_available, partition_pairings, partition_pantry, Readiness},
};
use crate::constants::PAGE_SIZE;

/// Least recently made first, never made before anything, then by name.
pub fn compare_recipes(a: &Recipe, b: &Recipe) -> Ordering {
    let by_date = match (a.date_last_made, b.date_last_made) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(&b),
    };
    by_date.then_with(|| a.name.cmp(&b.name))
}

pub fn sort_recipes(recipes: &mut [Recipe]) {
    recipes.sort_by(compare_recipes);
}

/// Moves ready recipes in front of the rest; both groups keep their order.
pub fn regroup_ready_first(summaries: Vec<RecipeSummary>) -> Vec<RecipeSummary> {
    let (mut ready, rest): (Vec<_>, Vec<_>) = summaries
        .into_iter()
        .partition(|summary| summary.readiness == Readiness::Ready);
    ready.extend(rest);
    ready
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub recipe: Recipe,
    pub readiness: Readiness,
    pub available_count: usize,
    pub total_count: usize,
    pub cost: Quantity,
    pub formatted_cost: Option<String>,
    pub formatted_date: Option<String>,
}

impl RecipeSummary {
    pub fn new(recipe: Recipe, pairings: &[Ingredient]) -> Self {
        let available_count = pairings.iter().filter(|i| is_available(i)).count();
        let total_count = pairings.len();
        let cost = recipe_cost(pairings);

        Self {
            formatted_cost: formatted_cost(&cost),
            formatted_date: recipe.formatted_date(),
            readiness: Readiness::classify(total_count, available_count),
            available_count,
            total_count,
            cost,
            recipe,
        }
    }

    pub fn css_class(&self) -> Option<&'static str> {
        self.readiness.css_class()
    }
}

/// Summaries in display order: sorted, then ready recipes first.
pub fn summarize_recipes(
    mut recipes: Vec<Recipe>,
    pairings: &HashMap<Uuid, Vec<Ingredient>>,
) -> Vec<RecipeSummary> {
    sort_recipes(&mut recipes);
    let summaries = recipes
        .into_iter()
        .map(|recipe| {
            let lines = pairings
                .get(&recipe.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            RecipeSummary::new(recipe, lines)
        })
        .collect();
    regroup_ready_first(summaries)
}

pub type RecipeList = PageContext<RecipeSummary>;

/// One page of the user's recipe list, from summaries already in display
/// order.
pub fn recipe_list(
    summaries: Vec<RecipeSummary>,
    page: Option<&str>,
) -> Result<RecipeList, PageRedirect> {
    let page = resolve_page(page, summaries.len() as i64, PAGE_SIZE)?;
    Ok(PageContext::from_rows(summaries, PAGE_SIZE, page))
}

/// One ingredient line of a recipe, ready for display.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeLine {
    pub ingredient: Ingredient,
    pub available: bool,
    pub formatted_amount: String,
    pub formatted_cost: Option<String>,
}

impl From<Ingredient> for RecipeLine {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            available: is_available(&ingredient),
            formatted_amount: formatted_amount(ingredient.amount_in_recipe.as_ref()),
            formatted_cost: formatted_line_cost(&ingredient),
            ingredient,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetail {
    pub summary: RecipeSummary,
    /// Available lines first, then missing ones.
    pub ingredients: PageContext<RecipeLine>,
    pub steps: PageContext<Step>,
}

/// A recipe with its ingredient lines and directions, each list paginated on
/// its own.
pub fn recipe_detail(
    recipe: Recipe,
    pairings: Vec<Ingredient>,
    mut steps: Vec<Step>,
    ingredients_page: Option<&str>,
    directions_page: Option<&str>,
) -> Result<RecipeDetail, DualPageRedirect> {
    let (ingredients_page, directions_page) = resolve_pages(
        (ingredients_page, pairings.len() as i64),
        (directions_page, steps.len() as i64),
        PAGE_SIZE,
    )?;

    let summary = RecipeSummary::new(recipe, &pairings);

    let (available, missing) = partition_pairings(pairings);
    let lines: Vec<RecipeLine> = available
        .into_iter()
        .chain(missing)
        .map(RecipeLine::from)
        .collect();

    steps.sort_by_key(|step| step.id);

    Ok(RecipeDetail {
        summary,
        ingredients: PageContext::from_rows(lines, PAGE_SIZE, ingredients_page),
        steps: PageContext::from_rows(steps, PAGE_SIZE, directions_page),
    })
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PantryView {
    pub in_stock: PageContext<Ingredient>,
    pub out_of_stock: PageContext<Ingredient>,
}

/// The pantry split into stocked and empty ingredients, both by name.
pub fn pantry_view(
    mut ingredients: Vec<Ingredient>,
    in_stock_page: Option<&str>,
    out_of_stock_page: Option<&str>,
) -> Result<PantryView, DualPageRedirect> {
    ingredients.sort_by(|a, b| a.name.cmp(&b.name));
    let (in_stock, out_of_stock) = partition_pantry(ingredients);

    let (in_stock_page, out_of_stock_page) = resolve_pages(
        (in_stock_page, in_stock.len() as i64),
        (out_of_stock_page, out_of_stock.len() as i64),
        PAGE_SIZE,
    )?;

    Ok(PantryView {
        in_stock: PageContext::from_rows(in_stock, PAGE_SIZE, in_stock_page),
        out_of_stock: PageContext::from_rows(out_of_stock, PAGE_SIZE, out_of_stock_page),
    })
}
