//! Data access. One repository per entity, each a thin wrapper over a
//! borrowed `SqlitePool` issuing parameterized SQL. Uniqueness and cascade
//! rules live in the schema (`core::db`); repositories translate constraint
//! failures into [`StoreError`] variants.

use thiserror::Error;

pub mod follows;
pub mod likes;
pub mod posts;
pub mod sessions;
pub mod users;

pub use follows::FollowRepo;
pub use likes::LikeRepo;
pub use posts::{FeedSource, PostRepo};
pub use sessions::SessionRepo;
pub use users::UserRepo;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record already exists")]
    Duplicate,

    #[error("follower and following cannot be the same user")]
    SelfFollow,

    #[error("record not found")]
    NotFound,

    #[error("constraint failed: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) => {
                if db.is_unique_violation() {
                    StoreError::Duplicate
                } else if db.is_foreign_key_violation() {
                    StoreError::NotFound
                } else if db.is_check_violation() {
                    StoreError::Invalid(db.message().to_string())
                } else {
                    StoreError::Database(sqlx::Error::Database(db))
                }
            }
            other => StoreError::Database(other),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::PathBuf;

    use sqlx::SqlitePool;

    use crate::core::db;
    use crate::models::models::User;
    use super::UserRepo;

    pub async fn pool() -> SqlitePool {
        db::connect("sqlite::memory:").await.expect("in-memory database")
    }

    /// File-backed pool with several connections, for tests that need
    /// writes to actually run concurrently.
    pub async fn file_pool() -> (SqlitePool, PathBuf) {
        let path = std::env::temp_dir().join(format!("network-test-{}.db", uuid::Uuid::new_v4().simple()));
        let pool = db::connect(&format!("sqlite://{}", path.display()))
            .await
            .expect("file database");
        (pool, path)
    }

    pub async fn remove_file_pool(pool: SqlitePool, path: PathBuf) {
        pool.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    pub async fn user(pool: &SqlitePool, username: &str) -> User {
        UserRepo::new(pool)
            .create(username, &format!("{}@example.com", username), "not-a-real-hash")
            .await
            .expect("create user")
    }
}
