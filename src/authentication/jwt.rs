use chrono::Duration;
use chrono::Local;
use hmac::{Hmac, Mac};
use jwt::SignWithKey;
use jwt::VerifyWithKey;
use serde::Deserialize;
use serde::Serialize;
use sha2::Sha256;

use crate::config::Config;
use crate::database::schema::{User, Uuid};
use crate::error::Error;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtSessionData {
    pub user_id: Uuid,
    pub username: String,
    iat: i64,
    exp: i64,
}

impl JwtSessionData {
    pub fn new(id: Uuid, username: String, lifetime_hours: i64) -> Self {
        let now = Local::now();
        let iat = now.timestamp();
        let exp = (now + Duration::hours(lifetime_hours)).timestamp();

        Self {
            user_id: id,
            username,
            iat,
            exp,
        }
    }

    pub fn is_expired(&self) -> bool {
        (self.exp - Local::now().timestamp()).is_negative()
    }
}

/// The logged in user, as far as the rest of the crate is concerned.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub user_id: Uuid,
    pub username: String,
}

impl From<JwtSessionData> for SessionData {
    fn from(value: JwtSessionData) -> Self {
        SessionData {
            user_id: value.user_id,
            username: value.username,
        }
    }
}

fn signing_key(config: &Config) -> Result<Hmac<Sha256>, Error> {
    Hmac::new_from_slice(config.session_secret.as_bytes())
        .map_err(|_| Error::Config(String::from("Invalid session secret")))
}

pub fn generate_jwt_session(user: &User, config: &Config) -> Result<String, Error> {
    let key = signing_key(config)?;
    let claims = JwtSessionData::new(
        user.id,
        user.username.to_owned(),
        config.session_lifetime_hours,
    );

    claims
        .sign_with_key(&key)
        .map_err(|e| Error::InvalidSession(format!("Could not sign token; {e}")))
}

pub fn verify_jwt_session(token: &str, config: &Config) -> Result<SessionData, Error> {
    let key = signing_key(config)?;

    let session: JwtSessionData = token
        .verify_with_key(&key)
        .map_err(|_| Error::InvalidSession(String::from("Invalid token")))?;

    if session.is_expired() {
        return Err(Error::InvalidSession(String::from("Token expired")));
    }

    Ok(session.into())
}
