pub const PAGE_SIZE: i64 = 10;

pub const DEFAULT_SESSION_LIFETIME_HOURS: i64 = 1;

pub const USER_CACHE_BIND_PREFIX: &str = "user-cache-key";
