mod database {
    pub mod actions;
    pub mod cost;
    pub mod error;
    pub mod form;
    pub mod listing;
    pub mod pagination;
    pub mod quantity;
    pub mod reconcile;
    pub mod schema;
    pub mod stock;
    pub mod validation;
}
mod authentication {
    pub mod cryptography;
    pub mod jwt;
}
mod config;
mod constants;

mod cache {
    pub mod cache;
}

pub use authentication::*;
pub use cache::cache::*;
pub use config::Config;
pub use constants::*;
pub use database::*;
pub use error::{Error, ValidationError};
pub use quantity::Quantity;
