use sqlx::SqlitePool;

use crate::core::helpers::now_iso;
use crate::models::models::User;
use super::StoreError;

pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        UserRepo { pool }
    }

    /// Fails with `Duplicate` when the username is taken.
    pub async fn create(&self, username: &str, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash, date_joined) VALUES (?, ?, ?, ?)
             RETURNING id, username, email, password_hash, date_joined",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(now_iso())
        .fetch_one(self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, date_joined FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, date_joined FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// Number of follow edges pointing at `user_id`.
    pub async fn follower_count(&self, user_id: i64) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE following_id = ?")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Number of follow edges leaving `user_id`.
    pub async fn following_count(&self, user_id: i64) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = ?")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Usernames of the authors of every post `user_id` has liked.
    pub async fn liked_post_authors(&self, user_id: i64) -> Result<Vec<String>, StoreError> {
        let authors = sqlx::query_scalar::<_, String>(
            "SELECT u.username FROM likes l
             JOIN posts p ON p.id = l.post_id
             JOIN users u ON u.id = p.user_id
             WHERE l.user_id = ?
             ORDER BY p.timestamp DESC, p.id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(authors)
    }
}
