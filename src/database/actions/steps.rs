use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{Error, QueryError},
    reconcile::NewStep,
    schema::{Step, Uuid},
};

pub async fn recipe_steps(recipe_id: Uuid, pool: &Pool<Postgres>) -> Result<Vec<Step>, Error> {
    let rows: Vec<Step> =
        sqlx::query_as("SELECT * FROM recipe_steps WHERE recipe_id = $1 ORDER BY id ASC")
            .bind(recipe_id)
            .fetch_all(pool)
            .await
            .map_err(QueryError::from)?;

    Ok(rows)
}

pub async fn create_step(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    step: &NewStep,
) -> Result<Uuid, Error> {
    let id: (Uuid,) = sqlx::query_as(
        "INSERT INTO recipe_steps (recipe_id, direction, notes) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(recipe_id)
    .bind(&step.direction)
    .bind(&step.notes)
    .fetch_one(&mut *conn)
    .await
    .map_err(QueryError::from)?;

    Ok(id.0)
}

pub async fn update_step(conn: &mut PgConnection, step: &Step) -> Result<(), Error> {
    sqlx::query(
        "UPDATE recipe_steps SET direction = $1, notes = $2 WHERE id = $3 AND recipe_id = $4",
    )
    .bind(&step.direction)
    .bind(&step.notes)
    .bind(step.id)
    .bind(step.recipe_id)
    .execute(&mut *conn)
    .await
    .map_err(QueryError::from)?;

    Ok(())
}

pub async fn delete_steps(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    ids: &[Uuid],
) -> Result<(), Error> {
    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query("DELETE FROM recipe_steps WHERE recipe_id = $1 AND id = ANY($2)")
        .bind(recipe_id)
        .bind(ids)
        .execute(&mut *conn)
        .await
        .map_err(QueryError::from)?;

    Ok(())
}
