use sqlx::SqlitePool;

use super::StoreError;

pub struct FollowRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FollowRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        FollowRepo { pool }
    }

    /// Records that `follower_id` follows `following_id`.
    ///
    /// Self-follows are rejected before the database is touched. A second
    /// insert of the same pair fails with `StoreError::Duplicate`; the
    /// unique constraint decides, so racing inserts resolve the same way.
    pub async fn insert(&self, follower_id: i64, following_id: i64) -> Result<(), StoreError> {
        if follower_id == following_id {
            return Err(StoreError::SelfFollow);
        }

        sqlx::query("INSERT INTO follows (follower_id, following_id) VALUES (?, ?)")
            .bind(follower_id)
            .bind(following_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Returns whether an edge was removed.
    pub async fn delete(&self, follower_id: i64, following_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND following_id = ?")
            .bind(follower_id)
            .bind(following_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(&self, follower_id: i64, following_id: i64) -> Result<bool, StoreError> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = ? AND following_id = ?)",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(self.pool)
        .await?;
        Ok(found != 0)
    }
}
