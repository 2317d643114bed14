use std::collections::HashMap;

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{Error, QueryError},
    quantity::Quantity,
    reconcile::NewIngredient,
    schema::{Ingredient, IngredientRow, PairingRow, Uuid},
};

fn stored(value: &Option<Quantity>) -> Option<String> {
    value.as_ref().map(Quantity::as_fraction)
}

/// Every ingredient of the user, by name.
pub async fn list_ingredients(
    user_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<Vec<Ingredient>, Error> {
    let rows: Vec<IngredientRow> = sqlx::query_as(
        "
        SELECT id, owning_user, name, cost, amount_in_pantry
        FROM ingredients
        WHERE owning_user = $1
        ORDER BY name ASC
    ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)?;

    rows.into_iter()
        .map(|row| Ingredient::try_from(row).map_err(Error::from))
        .collect()
}

/// The ingredients of one recipe with their recipe amounts, in the order
/// they were added.
pub async fn recipe_ingredients(
    recipe_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<Vec<Ingredient>, Error> {
    let rows: Vec<IngredientRow> = sqlx::query_as(
        "
        SELECT i.id, i.owning_user, i.name, i.cost, i.amount_in_pantry,
               ir.ingredient_amount AS amount_in_recipe
        FROM ingredients_recipes ir
        INNER JOIN ingredients i ON i.id = ir.ingredient_id
        WHERE ir.recipe_id = $1
        ORDER BY ir.id ASC
    ",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)?;

    rows.into_iter()
        .map(|row| Ingredient::try_from(row).map_err(Error::from))
        .collect()
}

/// All pairings of the user's recipes, grouped by recipe id.
pub async fn user_pairings(
    user_id: Uuid,
    pool: &Pool<Postgres>,
) -> Result<HashMap<Uuid, Vec<Ingredient>>, Error> {
    let rows: Vec<PairingRow> = sqlx::query_as(
        "
        SELECT ir.recipe_id, i.id, i.owning_user, i.name, i.cost, i.amount_in_pantry,
               ir.ingredient_amount AS amount_in_recipe
        FROM ingredients_recipes ir
        INNER JOIN ingredients i ON i.id = ir.ingredient_id
        WHERE i.owning_user = $1
        ORDER BY ir.id ASC
    ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(QueryError::from)?;

    let mut pairings: HashMap<Uuid, Vec<Ingredient>> = HashMap::new();
    for row in rows {
        let ingredient = Ingredient::try_from(row.ingredient)?;
        pairings.entry(row.recipe_id).or_default().push(ingredient);
    }

    Ok(pairings)
}

pub async fn create_ingredient(
    conn: &mut PgConnection,
    user_id: Uuid,
    ingredient: &NewIngredient,
) -> Result<Uuid, Error> {
    let id: (Uuid,) = sqlx::query_as(
        "
        INSERT INTO ingredients (owning_user, name, cost, amount_in_pantry)
        VALUES ($1, $2, $3, $4)
        RETURNING id
    ",
    )
    .bind(user_id)
    .bind(&ingredient.name)
    .bind(stored(&ingredient.cost))
    .bind(stored(&ingredient.amount_in_pantry))
    .fetch_one(&mut *conn)
    .await
    .map_err(QueryError::from)?;

    Ok(id.0)
}

/// Writes name, cost and pantry amount. The recipe amount lives on the
/// pairing row and is only written when `recipe_id` is given.
pub async fn update_ingredient(
    conn: &mut PgConnection,
    ingredient: &Ingredient,
    recipe_id: Option<Uuid>,
) -> Result<(), Error> {
    sqlx::query(
        "
        UPDATE ingredients SET name = $1, cost = $2, amount_in_pantry = $3
        WHERE id = $4 AND owning_user = $5
    ",
    )
    .bind(&ingredient.name)
    .bind(stored(&ingredient.cost))
    .bind(stored(&ingredient.amount_in_pantry))
    .bind(ingredient.id)
    .bind(ingredient.owning_user)
    .execute(&mut *conn)
    .await
    .map_err(QueryError::from)?;

    if let Some(recipe_id) = recipe_id {
        sqlx::query(
            "
            UPDATE ingredients_recipes SET ingredient_amount = $1
            WHERE recipe_id = $2 AND ingredient_id = $3
        ",
        )
        .bind(stored(&ingredient.amount_in_recipe))
        .bind(recipe_id)
        .bind(ingredient.id)
        .execute(&mut *conn)
        .await
        .map_err(QueryError::from)?;
    }

    Ok(())
}

/// Deletes the ingredients together with every pairing row that uses them.
pub async fn delete_ingredients(
    conn: &mut PgConnection,
    user_id: Uuid,
    ids: &[Uuid],
) -> Result<(), Error> {
    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        "
        DELETE FROM ingredients_recipes
        WHERE ingredient_id IN (SELECT id FROM ingredients WHERE id = ANY($1) AND owning_user = $2)
    ",
    )
    .bind(ids)
    .bind(user_id)
    .execute(&mut *conn)
    .await
    .map_err(QueryError::from)?;

    sqlx::query("DELETE FROM ingredients WHERE id = ANY($1) AND owning_user = $2")
        .bind(ids)
        .bind(user_id)
        .execute(&mut *conn)
        .await
        .map_err(QueryError::from)?;

    Ok(())
}

pub async fn pair_ingredient(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    ingredient_id: Uuid,
    amount_in_recipe: &Option<Quantity>,
) -> Result<(), Error> {
    sqlx::query(
        "
        INSERT INTO ingredients_recipes (recipe_id, ingredient_id, ingredient_amount)
        VALUES ($1, $2, $3)
        ON CONFLICT (recipe_id, ingredient_id) DO NOTHING
    ",
    )
    .bind(recipe_id)
    .bind(ingredient_id)
    .bind(stored(amount_in_recipe))
    .execute(&mut *conn)
    .await
    .map_err(QueryError::from)?;

    Ok(())
}

pub async fn unpair_ingredients(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    ids: &[Uuid],
) -> Result<(), Error> {
    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query("DELETE FROM ingredients_recipes WHERE recipe_id = $1 AND ingredient_id = ANY($2)")
        .bind(recipe_id)
        .bind(ids)
        .execute(&mut *conn)
        .await
        .map_err(QueryError::from)?;

    Ok(())
}

/// Writes a new pantry amount, as after making a recipe.
pub async fn set_amount_in_pantry(
    conn: &mut PgConnection,
    ingredient: &Ingredient,
) -> Result<(), Error> {
    sqlx::query("UPDATE ingredients SET amount_in_pantry = $1 WHERE id = $2")
        .bind(stored(&ingredient.amount_in_pantry))
        .bind(ingredient.id)
        .execute(&mut *conn)
        .await
        .map_err(QueryError::from)?;

    Ok(())
}
