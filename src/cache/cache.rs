use std::{fmt::Debug, future::Future};

use redis::{aio::MultiplexedConnection, AsyncCommands, FromRedisValue, ToRedisArgs};
use redis_macros::{FromRedisValue, ToRedisArgs};
use serde::{Deserialize, Serialize};

use crate::{
    constants::USER_CACHE_BIND_PREFIX,
    error::{CacheError, Error},
    schema::Uuid,
};

// Caching - keys

#[derive(Serialize, Clone, Debug)]
pub struct CacheKey<T: ToString + Serialize> {
    _value: T,
    _type: CacheKeyType,
}

impl<T: ToString + Serialize> CacheKey<T> {
    pub fn from(r#type: CacheKeyType, key: T) -> Self {
        Self {
            _value: key,
            _type: r#type,
        }
    }

    pub fn to_string(&self) -> String {
        self.into()
    }
}

impl<T: ToString + Serialize> From<&CacheKey<T>> for String {
    fn from(key: &CacheKey<T>) -> Self {
        match &key._type {
            CacheKeyType::RecipeSummaries(_) => {
                format!("recipe-summaries-{}", key._value.to_string())
            }
        }
    }
}

/// Every per-user key is bound to that user's cache key, so rotating it drops
/// all of the user's cached values at once.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum CacheKeyType {
    RecipeSummaries(Uuid),
}

impl CacheKeyType {
    pub fn new<T: ToString + Serialize>(self, key: T) -> CacheKey<T> {
        CacheKey::from(self, key)
    }
}

impl<T: ToString + Serialize> From<CacheKey<T>> for CacheLifetime {
    fn from(key: CacheKey<T>) -> Self {
        match key._type {
            CacheKeyType::RecipeSummaries(user_id) => CacheLifetime::BindUserCache(user_id),
        }
    }
}

fn user_cache_bind_key(user_id: Uuid) -> String {
    format!("{USER_CACHE_BIND_PREFIX}-{user_id}")
}

/// Invalidates everything cached for `user_id`.
pub async fn rotate_user_cache(
    user_id: Uuid,
    cache: &mut MultiplexedConnection,
) -> Result<(), Error> {
    let bind = uuid::Uuid::new_v4().to_string();
    log::trace!("> Rotating cache bind of user {user_id}");
    set_cache_value(user_cache_bind_key(user_id), bind, cache).await
}

// Cache - wrappers

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum CacheLifetime {
    BindUserCache(Uuid),
}

impl CacheLifetime {
    pub async fn get_cache_bind(
        &self,
        cache: &mut MultiplexedConnection,
    ) -> Result<Option<String>, Error> {
        match self {
            CacheLifetime::BindUserCache(user_id) => {
                get_cache_value::<String, String>(user_cache_bind_key(*user_id), cache).await
            }
        }
    }

    /// A cached value stays valid while the bind it was stored with is current.
    pub async fn validate_cache_bind(
        &self,
        bind: &Option<String>,
        cache: &mut MultiplexedConnection,
    ) -> Result<bool, Error> {
        Ok(bind == &self.get_cache_bind(cache).await?)
    }
}

#[derive(Serialize, Deserialize, FromRedisValue, ToRedisArgs, Clone)]
pub struct RedisValue<T: Serialize + Send + Sync + Clone> {
    pub value: T,
    _lifetime: CacheLifetime,
    _bind: Option<String>,
}

impl<T: Serialize + Send + Sync + Clone + for<'a> Deserialize<'a>> RedisValue<T> {
    async fn new(
        value: T,
        lifetime: CacheLifetime,
        cache: &mut MultiplexedConnection,
    ) -> Result<Self, Error> {
        let bind = lifetime.get_cache_bind(cache).await?;

        Ok(Self {
            value,
            _lifetime: lifetime,
            _bind: bind,
        })
    }

    async fn validate<K: ToString + Serialize>(
        &self,
        key: CacheKey<K>,
        cache: &mut MultiplexedConnection,
    ) -> Result<bool, Error> {
        let lifetime: CacheLifetime = key.into();
        if lifetime != self._lifetime {
            log::trace!("> Cached value was stored under another binding");
            return Ok(false);
        }
        self._lifetime.validate_cache_bind(&self._bind, cache).await
    }

    /// Returns the cached list under `key` while its bind is still current,
    /// otherwise runs `callback` and caches what it returns.
    pub async fn get_or_list<'a, F, Fut, K>(
        key: CacheKey<K>,
        cache: &mut MultiplexedConnection,
        callback: F,
    ) -> Result<RedisValue<Vec<T>>, Error>
    where
        Vec<T>: Serialize + Send + Sync,
        K: ToString + Serialize + Clone + Send + Sync + Debug,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<T>, Error>> + Send + 'a,
    {
        let value = get_cache_value::<String, RedisValue<Vec<T>>>((&key).into(), cache)
            .await
            .unwrap_or_else(|_| {
                let mut c = cache.clone();
                let k = key.to_string();
                tokio::spawn(async move {
                    log::error!("> Failed to deserialize cached value. Deleting {}", &k);
                    if let Err(e) = delete_cache_value(k, &mut c).await {
                        log::error!("> Failed to delete cached value! {e}");
                    }
                });
                None
            });
        // * Cannot use .map(|| {...}) due to async closures
        let value = match value {
            Some(value) => {
                log::trace!("> Found {:?}", key.to_string());
                match value.validate(key.to_owned(), cache).await? {
                    true => Some(value),
                    false => {
                        log::trace!("> Invalidated {:?}", key.to_string());
                        None
                    }
                }
            }
            None => None,
        };

        match value {
            Some(value) => Ok(value),
            None => {
                log::trace!("> Fetching {:?}", key._value);
                let value = callback().await?;
                let lifetime: CacheLifetime = key.to_owned().into();
                let value = RedisValue::new(value, lifetime, cache).await?;

                if let Err(e) = set_cache_value::<String, RedisValue<Vec<T>>>(
                    (&key).into(),
                    value.clone(),
                    cache,
                )
                .await
                {
                    log::error!("{e:?}");
                }

                Ok(value)
            }
        }
    }
}

// Cache - raw handlers

pub async fn set_cache_value<K: ToRedisArgs + Send + Sync, V: ToRedisArgs + Send + Sync>(
    key: K,
    value: V,
    cache: &mut MultiplexedConnection,
) -> Result<(), Error> {
    let _: () = cache.set(key, value).await.map_err(CacheError::from)?;

    Ok(())
}

pub async fn delete_cache_value<K: ToRedisArgs + Send + Sync>(
    key: K,
    cache: &mut MultiplexedConnection,
) -> Result<(), Error> {
    let _: () = cache.del(key).await.map_err(CacheError::from)?;

    Ok(())
}

pub async fn get_cache_value<K: ToRedisArgs + Send + Sync, V: FromRedisValue>(
    key: K,
    cache: &mut MultiplexedConnection,
) -> Result<Option<V>, Error> {
    let value: Option<V> = cache.get(key).await.map_err(CacheError::from)?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_per_user() {
        let key = CacheKeyType::RecipeSummaries(7).new(7);
        assert_eq!(key.to_string(), "recipe-summaries-7");
        assert_eq!(user_cache_bind_key(7), "user-cache-key-7");

        assert_eq!(CacheLifetime::from(key), CacheLifetime::BindUserCache(7));
    }
}
