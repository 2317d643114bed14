use chrono::NaiveDate;
use redis::aio::MultiplexedConnection;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    cache::cache::{rotate_user_cache, CacheKeyType, RedisValue},
    error::{Error, QueryError},
    listing::{
        recipe_detail, recipe_list, summarize_recipes, RecipeDetail, RecipeList, RecipeSummary,
    },
    pagination::{DualPageRedirect, PageRedirect},
    schema::{Recipe, Uuid},
    stock::{mark_as_made, MadeRecipe},
};

use super::{
    ingredients::{recipe_ingredients, set_amount_in_pantry, user_pairings},
    steps::recipe_steps,
};

/// Every recipe of the user, least recently made first.
pub async fn list_recipes(user_id: Uuid, pool: &Pool<Postgres>) -> Result<Vec<Recipe>, Error> {
    let rows: Vec<Recipe> = sqlx::query_as(
        "
        SELECT * FROM recipes
        WHERE owning_user = $1
        ORDER BY date_last_made ASC NULLS FIRST, name
    ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)?;

    Ok(rows)
}

pub async fn get_recipe(
    id: Uuid,
    user_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<Option<Recipe>, Error> {
    let row: Option<Recipe> =
        sqlx::query_as("SELECT * FROM recipes WHERE id = $1 AND owning_user = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(QueryError::from)?;

    Ok(row)
}

pub async fn require_recipe(
    id: Uuid,
    user_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<Recipe, Error> {
    get_recipe(id, user_id, pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Recipe {id}")))
}

pub async fn create_recipe(
    conn: &mut PgConnection,
    user_id: Uuid,
    name: &str,
) -> Result<Uuid, Error> {
    let id: (Uuid,) =
        sqlx::query_as("INSERT INTO recipes (owning_user, name) VALUES ($1, $2) RETURNING id")
            .bind(user_id)
            .bind(name)
            .fetch_one(&mut *conn)
            .await
            .map_err(QueryError::from)?;

    Ok(id.0)
}

pub async fn update_recipe(conn: &mut PgConnection, recipe: &Recipe) -> Result<(), Error> {
    sqlx::query(
        "UPDATE recipes SET name = $1, date_last_made = $2 WHERE id = $3 AND owning_user = $4",
    )
    .bind(&recipe.name)
    .bind(recipe.date_last_made)
    .bind(recipe.id)
    .bind(recipe.owning_user)
    .execute(&mut *conn)
    .await
    .map_err(QueryError::from)?;

    Ok(())
}

/// Deletes a recipe with its steps and pairings. The paired ingredients stay
/// in the pantry.
pub async fn delete_recipe(
    id: Uuid,
    user_id: Uuid,
    pool: &Pool<Postgres>,
    cache: &mut MultiplexedConnection,
) -> Result<(), Error> {
    let recipe = require_recipe(id, user_id, pool).await?;

    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    sqlx::query("DELETE FROM recipe_steps WHERE recipe_id = $1")
        .bind(recipe.id)
        .execute(&mut *tr)
        .await
        .map_err(QueryError::from)?;

    sqlx::query("DELETE FROM ingredients_recipes WHERE recipe_id = $1")
        .bind(recipe.id)
        .execute(&mut *tr)
        .await
        .map_err(QueryError::from)?;

    sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(recipe.id)
        .execute(&mut *tr)
        .await
        .map_err(QueryError::from)?;

    tr.commit()
        .await
        .map_err(|_| QueryError::new("Could not commit transaction".to_owned()))?;

    log::info!("Deleted recipe {} of user {user_id}", recipe.id);
    rotate_user_cache(user_id, cache).await
}

/// Consumes the recipe's available ingredients from the pantry and stamps it
/// with `today`, all in one transaction.
pub async fn mark_recipe_made(
    id: Uuid,
    user_id: Uuid,
    today: NaiveDate,
    pool: &Pool<Postgres>,
    cache: &mut MultiplexedConnection,
) -> Result<MadeRecipe, Error> {
    let recipe = require_recipe(id, user_id, pool).await?;
    let pairings = recipe_ingredients(recipe.id, pool).await?;

    let made = mark_as_made(&recipe, &pairings, today);

    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    update_recipe(&mut *tr, &made.recipe).await?;
    for ingredient in made.consumed.iter() {
        set_amount_in_pantry(&mut *tr, ingredient).await?;
    }

    tr.commit()
        .await
        .map_err(|_| QueryError::new("Could not commit transaction".to_owned()))?;

    log::info!(
        "Made recipe {} of user {user_id}, consumed {} ingredients",
        recipe.id,
        made.consumed.len()
    );
    rotate_user_cache(user_id, cache).await?;

    Ok(made)
}

/// All of the user's recipe summaries in display order. Cached until the
/// user's data changes.
pub async fn fetch_recipe_summaries(
    user_id: Uuid,
    pool: &Pool<Postgres>,
    cache: &mut MultiplexedConnection,
) -> Result<Vec<RecipeSummary>, Error> {
    let pool = pool.clone();
    let summaries = RedisValue::<RecipeSummary>::get_or_list(
        CacheKeyType::RecipeSummaries(user_id).new(user_id),
        cache,
        move || async move {
            let recipes = list_recipes(user_id, &pool).await?;
            let pairings = user_pairings(user_id, &pool).await?;
            Ok(summarize_recipes(recipes, &pairings))
        },
    )
    .await?;

    Ok(summaries.value)
}

pub async fn fetch_recipe_list(
    user_id: Uuid,
    page: Option<&str>,
    pool: &Pool<Postgres>,
    cache: &mut MultiplexedConnection,
) -> Result<Result<RecipeList, PageRedirect>, Error> {
    let summaries = fetch_recipe_summaries(user_id, pool, cache).await?;
    Ok(recipe_list(summaries, page))
}

pub async fn fetch_recipe_detail(
    id: Uuid,
    user_id: Uuid,
    ingredients_page: Option<&str>,
    directions_page: Option<&str>,
    pool: &Pool<Postgres>,
) -> Result<Result<RecipeDetail, DualPageRedirect>, Error> {
    let recipe = require_recipe(id, user_id, pool).await?;
    let pairings = recipe_ingredients(recipe.id, pool).await?;
    let steps = recipe_steps(recipe.id, pool).await?;

    Ok(recipe_detail(
        recipe,
        pairings,
        steps,
        ingredients_page,
        directions_page,
    ))
}
