use std::env;

use redis::aio::MultiplexedConnection;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::{constants::DEFAULT_SESSION_LIFETIME_HOURS, error::Error};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub session_secret: String,
    pub session_lifetime_hours: i64,
}

fn required(key: &str) -> Result<String, Error> {
    env::var(key).map_err(|_| Error::Config(format!("{key} must be set")))
}

impl Config {
    /// Reads the environment, loading a `.env` file first when there is one.
    pub fn from_env() -> Result<Self, Error> {
        if let Err(e) = dotenvy::dotenv() {
            log::warn!("No .env file loaded: {e}");
        }

        let session_lifetime_hours = match env::var("SESSION_LIFETIME_HOURS") {
            Ok(value) => value.trim().parse().map_err(|_| {
                Error::Config(format!("Invalid SESSION_LIFETIME_HOURS value {value}"))
            })?,
            Err(_) => DEFAULT_SESSION_LIFETIME_HOURS,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            session_secret: required("SESSION_SECRET")?,
            session_lifetime_hours,
        })
    }

    pub async fn connect_database(&self) -> Result<Pool<Postgres>, Error> {
        log::trace!("> Connecting to database");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&self.database_url)
            .await?;
        Ok(pool)
    }

    pub async fn connect_cache(&self) -> Result<MultiplexedConnection, Error> {
        log::trace!("> Connecting to cache");
        let client = redis::Client::open(self.redis_url.as_str())?;
        let connection = client.get_multiplexed_async_connection().await?;
        Ok(connection)
    }
}
