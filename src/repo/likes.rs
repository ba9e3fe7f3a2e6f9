use sqlx::SqlitePool;

use super::StoreError;

pub struct LikeRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LikeRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        LikeRepo { pool }
    }

    /// Adds the like. Returns `false` when it was already recorded, which
    /// includes losing a race against a concurrent identical insert.
    pub async fn add(&self, user_id: i64, post_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("INSERT INTO likes (user_id, post_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(post_id)
            .execute(self.pool)
            .await;

        match result.map_err(StoreError::from) {
            Ok(_) => Ok(true),
            Err(StoreError::Duplicate) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Returns whether a like was removed.
    pub async fn remove(&self, user_id: i64, post_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = ? AND post_id = ?")
            .bind(user_id)
            .bind(post_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(&self, user_id: i64, post_id: i64) -> Result<bool, StoreError> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = ? AND post_id = ?)",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(self.pool)
        .await?;
        Ok(found != 0)
    }
}
