use sqlx::SqlitePool;
use uuid::Uuid;

use crate::core::helpers::now_iso;
use crate::models::models::Session;
use super::StoreError;

pub struct SessionRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SessionRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        SessionRepo { pool }
    }

    /// Issues a fresh bearer token for `user_id`.
    pub async fn create(&self, user_id: i64) -> Result<String, StoreError> {
        let token = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(user_id)
            .bind(now_iso())
            .execute(self.pool)
            .await?;
        Ok(token)
    }

    pub async fn find(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT token, user_id, created_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;
        Ok(session)
    }

    pub async fn delete(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
