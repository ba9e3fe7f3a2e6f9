pub const MAX_POST_LENGTH: usize = 140;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 3;
/// Upper bound on posts embedded in an expanded profile.
pub const PROFILE_POSTS_LIMIT: i64 = 50;
pub const DEFAULT_POSTS_PER_PAGE: i64 = 10;

pub fn database_url() -> String {
    std::env::var("NETWORK_DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://network.db?mode=rwc".to_string())
}

pub fn bind_addr() -> String {
    std::env::var("NETWORK_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string())
}

pub fn token_expiration_hours() -> i64 {
    std::env::var("NETWORK_TOKEN_EXPIRATION_HOURS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(24)
}

pub fn posts_per_page() -> i64 {
    std::env::var("NETWORK_POSTS_PER_PAGE")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_POSTS_PER_PAGE)
}

pub fn seed_demo_data() -> bool {
    std::env::var("NETWORK_SEED_DEMO")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}
