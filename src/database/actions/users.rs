use crate::{
    authentication::{
        cryptography::{hash_password, verify_password},
        jwt::generate_jwt_session,
    },
    config::Config,
    error::{Error, QueryError, ValidationError},
    schema::User,
    validation::validate_signup,
};

use sqlx::{Pool, Postgres};

pub async fn get_user(pool: &Pool<Postgres>, username: &str) -> Result<Option<User>, Error> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(row)
}

/// Validates the signup fields, then creates the user with a hashed password.
pub async fn register_user(
    username: &str,
    password: &str,
    confirm_password: &str,
    pool: &Pool<Postgres>,
) -> Result<User, Error> {
    let taken = get_user(pool, username).await?.is_some();
    validate_signup(username, password, confirm_password, taken).map_err(|e| {
        log::warn!("Rejected signup of {username:?}: {e}");
        e
    })?;

    let hash = hash_password(password)?;

    let user: Option<User> = sqlx::query_as(
        "
        INSERT INTO users (username, password)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING RETURNING *;
    ",
    )
    .bind(username)
    .bind(hash)
    .fetch_optional(pool)
    .await
    .map_err(QueryError::from)?;

    // a concurrent signup can still win the race for the name
    let user = user.ok_or(ValidationError::UsernameTaken)?;

    log::info!("Created user {}", user.id);
    Ok(user)
}

/// Checks the credentials and issues a session token.
pub async fn login_user(
    username: &str,
    password: &str,
    config: &Config,
    pool: &Pool<Postgres>,
) -> Result<String, Error> {
    let Some(user) = get_user(pool, username).await? else {
        return Err(Error::InvalidCredentials);
    };

    if !verify_password(password, &user.password)? {
        return Err(Error::InvalidCredentials);
    }

    generate_jwt_session(&user, config)
}
