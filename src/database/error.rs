use std::fmt::{self, Display};

use thiserror::Error;

#[derive(Debug)]
pub struct QueryError {
    info: String,
}

impl QueryError {
    pub fn new(info: String) -> Self {
        Self { info }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::Configuration(e) => Self::new(format!("{e}")),
            sqlx::Error::Database(e) => Self::new(format!("{e}")),
            sqlx::Error::Io(e) => Self::new(format!("{e}")),
            sqlx::Error::Tls(e) => Self::new(format!("{e}")),
            sqlx::Error::Protocol(e) => Self::new(e),
            sqlx::Error::RowNotFound => Self::new(String::from("RowNotFound")),
            sqlx::Error::TypeNotFound { type_name } => {
                Self::new(format!("Type not found: {type_name}"))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => {
                Self::new(format!("Column index out of bounds {index} ({len})"))
            }
            sqlx::Error::ColumnNotFound(e) => Self::new(e),
            sqlx::Error::ColumnDecode { index, source } => {
                Self::new(format!("Column decode {index} ({source})"))
            }
            sqlx::Error::Decode(e) => Self::new(format!("{e}")),
            sqlx::Error::PoolTimedOut => Self::new(String::from("Pool timed out")),
            sqlx::Error::PoolClosed => Self::new(String::from("Pool closed")),
            sqlx::Error::WorkerCrashed => Self::new(String::from("Worker crashed")),
            sqlx::Error::Migrate(e) => Self::new(format!("{e}")),
            _ => Self::new(String::from("Unknown error")),
        }
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info)
    }
}

impl std::error::Error for QueryError {}

#[derive(Debug)]
pub struct CacheError {
    info: String,
}

impl From<redis::RedisError> for CacheError {
    fn from(value: redis::RedisError) -> Self {
        Self {
            info: format!("{:?} - {:?}", value.code(), value.detail()),
        }
    }
}

impl CacheError {
    pub fn new(info: String) -> Self {
        Self { info }
    }
}

impl Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info)
    }
}

impl std::error::Error for CacheError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    info: String,
}

impl TypeError {
    pub fn new(info: &str) -> Self {
        Self {
            info: info.to_string(),
        }
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.info)
    }
}

impl std::error::Error for TypeError {}

/// A rejected form submission. Only one is ever reported per submission; the
/// message is meant to be shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Recipe names must be between 1 and 35 characters.")]
    RecipeNameLength,
    #[error("Recipe names must be unique.")]
    RecipeNameTaken,
    #[error("Direction notes cannot be included without an associated direction.")]
    NotesWithoutDirection,
    #[error("Recipe directions must be between 1 and 100 characters.")]
    DirectionLength,
    #[error("Ingredient names must be unique.")]
    IngredientNameTaken,
    #[error("An ingredient cost cannot be included without an associated ingredient name.")]
    OrphanedCost,
    #[error("An ingredient amount cannot be included without an associated ingredient name.")]
    OrphanedAmount,
    #[error(
        "An ingredient number per purchase cannot be included without an associated ingredient name."
    )]
    OrphanedNumberPerPurchase,
    #[error("Ingredient names must be between 1 and 100 characters.")]
    IngredientNameLength,
    #[error("Costs may only include numbers, up to one decimal point, and up to one dollar sign.")]
    MalformedCost,
    #[error(
        "Ingredient amounts must be written as decimals or fractions which include numbers, up to one decimal point, and up to one forward slash."
    )]
    MalformedAmount,
    #[error("Please fill out all fields.")]
    MissingSignupField,
    #[error("Sorry, that username is already taken.")]
    UsernameTaken,
    #[error(
        "Usernames may only contain capital or lowercase letters, numbers, and the following symbols: !, @, #, $, %, ^, &, or *"
    )]
    MalformedUsername,
    #[error(
        "Passwords may only contain capital or lowercase letters, numbers, and the following symbols: !, @, #, $, %, ^, &, or *"
    )]
    MalformedPassword,
    #[error("The provided passwords do not match.")]
    PasswordMismatch,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Invalid type conversion {0}")]
    Type(#[from] TypeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid session; {0}")]
    InvalidSession(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Self::Query(QueryError::from(value))
    }
}

impl From<redis::RedisError> for Error {
    fn from(value: redis::RedisError) -> Self {
        Self::Cache(CacheError::from(value))
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::Hash(format!("{value}"))
    }
}
