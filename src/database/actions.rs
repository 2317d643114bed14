pub mod ingredients;
pub mod recipes;
pub mod steps;
pub mod users;

use std::collections::HashMap;

use redis::aio::MultiplexedConnection;
use serde::Serialize;
use sqlx::{Executor, PgConnection, Pool, Postgres};

use crate::{
    cache::cache::rotate_user_cache,
    error::{Error, QueryError},
    form::{FormData, FormRows},
    listing::{pantry_view, PantryView},
    pagination::DualPageRedirect,
    reconcile::{reconcile, IngredientRef, Notice, OperationSet, RecipeChange, Snapshot, Target},
    schema::Uuid,
};

use ingredients::{
    create_ingredient, delete_ingredients, list_ingredients, pair_ingredient, recipe_ingredients,
    unpair_ingredients, update_ingredient,
};
use recipes::{create_recipe, list_recipes, require_recipe, update_recipe};
use steps::{create_step, delete_steps, recipe_steps, update_step};

const SCHEMA: &str = include_str!("schema.sql");

/// Creates any missing tables.
pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<(), Error> {
    pool.execute(SCHEMA).await.map_err(QueryError::from)?;
    log::info!("Database initialized");
    Ok(())
}

/// What a submitted form edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    NewRecipe,
    Recipe(Uuid),
    Pantry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    /// The edited or newly created recipe.
    pub recipe_id: Option<Uuid>,
    pub notice: Option<Notice>,
}

/// Reconciles a submitted form against the user's current data and applies
/// the result. A rejected form changes nothing.
pub async fn submit_form(
    user_id: Uuid,
    target: FormTarget,
    data: FormData,
    pool: &Pool<Postgres>,
    cache: &mut MultiplexedConnection,
) -> Result<Submission, Error> {
    let form = FormRows::from(data);

    let recipes = list_recipes(user_id, pool).await?;
    let ingredients = list_ingredients(user_id, pool).await?;

    let (recipe, pairings, steps) = match target {
        FormTarget::Recipe(id) => {
            let recipe = require_recipe(id, user_id, pool).await?;
            let pairings = recipe_ingredients(recipe.id, pool).await?;
            let steps = recipe_steps(recipe.id, pool).await?;
            (Some(recipe), pairings, steps)
        }
        _ => (None, vec![], vec![]),
    };

    let snapshot_target = match (&target, &recipe) {
        (FormTarget::Recipe(_), Some(recipe)) => Target::Recipe {
            recipe,
            pairings: &pairings,
            steps: &steps,
        },
        (FormTarget::Pantry, _) => Target::Pantry,
        _ => Target::NewRecipe,
    };

    let snapshot = Snapshot {
        user_id,
        recipes: &recipes,
        ingredients: &ingredients,
        target: snapshot_target,
    };

    let reconciliation = reconcile(&snapshot, &form).map_err(|e| {
        log::warn!("Rejected submission of user {user_id}: {e}");
        e
    })?;

    let recipe_id = apply_operations(
        user_id,
        recipe.as_ref().map(|recipe| recipe.id),
        &reconciliation.operations,
        pool,
    )
    .await?;

    if !reconciliation.operations.is_empty() {
        rotate_user_cache(user_id, cache).await?;
    }

    Ok(Submission {
        recipe_id,
        notice: reconciliation.notice,
    })
}

/// Applies one submission's operations in a single transaction and returns
/// the target recipe's id, which is new when the set creates the recipe.
pub async fn apply_operations(
    user_id: Uuid,
    recipe_id: Option<Uuid>,
    operations: &OperationSet,
    pool: &Pool<Postgres>,
) -> Result<Option<Uuid>, Error> {
    if operations.is_empty() {
        return Ok(recipe_id);
    }

    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    let recipe_id = match &operations.recipe {
        Some(RecipeChange::Create { name }) => Some(create_recipe(&mut *tr, user_id, name).await?),
        Some(RecipeChange::Update(recipe)) => {
            update_recipe(&mut *tr, recipe).await?;
            Some(recipe.id)
        }
        None => recipe_id,
    };

    apply_ingredient_operations(&mut *tr, user_id, recipe_id, operations).await?;

    if let Some(recipe_id) = recipe_id {
        delete_steps(&mut *tr, recipe_id, &operations.delete_steps).await?;
        for step in operations.update_steps.iter() {
            update_step(&mut *tr, step).await?;
        }
        for step in operations.create_steps.iter() {
            create_step(&mut *tr, recipe_id, step).await?;
        }
    }

    tr.commit()
        .await
        .map_err(|_| QueryError::new("Could not commit transaction".to_owned()))?;

    log::info!(
        "Applied operations for user {user_id}: {} created, {} paired, {} deleted, {} new steps",
        operations.create_ingredients.len(),
        operations.pair_ingredients.len(),
        operations.delete_ingredients.len(),
        operations.create_steps.len(),
    );

    Ok(recipe_id)
}

async fn apply_ingredient_operations(
    conn: &mut PgConnection,
    user_id: Uuid,
    recipe_id: Option<Uuid>,
    operations: &OperationSet,
) -> Result<(), Error> {
    if let Some(recipe_id) = recipe_id {
        unpair_ingredients(conn, recipe_id, &operations.unpair_ingredients).await?;
    }
    delete_ingredients(conn, user_id, &operations.delete_ingredients).await?;

    for ingredient in operations.update_ingredients.iter() {
        update_ingredient(conn, ingredient, recipe_id).await?;
    }

    let mut created: HashMap<&str, Uuid> = HashMap::new();
    for ingredient in operations.create_ingredients.iter() {
        let id = create_ingredient(conn, user_id, ingredient).await?;
        created.insert(ingredient.name.as_str(), id);
    }

    let Some(recipe_id) = recipe_id else {
        return Ok(());
    };

    for pairing in operations.pair_ingredients.iter() {
        let ingredient_id = match &pairing.ingredient {
            IngredientRef::Existing(id) => *id,
            IngredientRef::New(name) => *created
                .get(name.as_str())
                .ok_or_else(|| Error::NotFound(format!("Ingredient {name}")))?,
        };
        pair_ingredient(conn, recipe_id, ingredient_id, &pairing.amount_in_recipe).await?;
    }

    Ok(())
}

/// The user's pantry, split and paginated.
pub async fn fetch_pantry(
    user_id: Uuid,
    in_stock_page: Option<&str>,
    out_of_stock_page: Option<&str>,
    pool: &Pool<Postgres>,
) -> Result<Result<PantryView, DualPageRedirect>, Error> {
    let ingredients = list_ingredients(user_id, pool).await?;
    Ok(pantry_view(ingredients, in_stock_page, out_of_stock_page))
}
