use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::core::helpers::now_iso;
use crate::models::models::Post;
use super::StoreError;

const POST_COLUMNS: &str = "p.id, p.body, p.user_id, u.username AS author, p.timestamp";

/// Which posts a listing draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    All,
    /// Posts by every user the given user follows.
    Following(i64),
    /// Posts by the given user.
    Profile(i64),
}

impl FeedSource {
    fn filter(&self) -> (&'static str, Option<i64>) {
        match self {
            FeedSource::All => ("", None),
            FeedSource::Following(user_id) => (
                "WHERE p.user_id IN (SELECT following_id FROM follows WHERE follower_id = ?)",
                Some(*user_id),
            ),
            FeedSource::Profile(user_id) => ("WHERE p.user_id = ?", Some(*user_id)),
        }
    }
}

pub struct PostRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        PostRepo { pool }
    }

    pub async fn create(&self, user_id: i64, body: &str) -> Result<Post, StoreError> {
        self.create_at(user_id, body, &now_iso()).await
    }

    /// Inserts with an explicit timestamp (RFC 3339, as produced by `now_iso`).
    pub async fn create_at(&self, user_id: i64, body: &str, timestamp: &str) -> Result<Post, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO posts (body, user_id, timestamp) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(body)
        .bind(user_id)
        .bind(timestamp)
        .fetch_one(self.pool)
        .await?;

        self.find(id).await?.ok_or(StoreError::NotFound)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Post>, StoreError> {
        let sql = format!(
            "SELECT {} FROM posts p JOIN users u ON u.id = p.user_id WHERE p.id = ?",
            POST_COLUMNS
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(post)
    }

    /// Replaces the body; the timestamp is left untouched.
    pub async fn update_body(&self, id: i64, body: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE posts SET body = ? WHERE id = ?")
            .bind(body)
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    pub async fn count(&self, source: FeedSource) -> Result<i64, StoreError> {
        let (filter, bind) = source.filter();
        let sql = format!("SELECT COUNT(*) FROM posts p {}", filter);
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(user_id) = bind {
            query = query.bind(user_id);
        }
        Ok(query.fetch_one(self.pool).await?)
    }

    /// Newest first; equal timestamps fall back to the higher id first.
    pub async fn page(&self, source: FeedSource, limit: i64, offset: i64) -> Result<Vec<Post>, StoreError> {
        let (filter, bind) = source.filter();
        let sql = format!(
            "SELECT {} FROM posts p JOIN users u ON u.id = p.user_id {}
             ORDER BY p.timestamp DESC, p.id DESC LIMIT ? OFFSET ?",
            POST_COLUMNS, filter
        );
        let mut query = sqlx::query_as::<_, Post>(&sql);
        if let Some(user_id) = bind {
            query = query.bind(user_id);
        }
        let posts = query
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;
        Ok(posts)
    }

    pub async fn by_user(&self, user_id: i64, limit: i64) -> Result<Vec<Post>, StoreError> {
        self.page(FeedSource::Profile(user_id), limit, 0).await
    }

    /// Liking usernames for each of `post_ids`, fetched in one query.
    pub async fn like_usernames(&self, post_ids: &[i64]) -> Result<HashMap<i64, Vec<String>>, StoreError> {
        let mut likes: HashMap<i64, Vec<String>> = HashMap::new();
        if post_ids.is_empty() {
            return Ok(likes);
        }

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT l.post_id, u.username FROM likes l JOIN users u ON u.id = l.user_id WHERE l.post_id IN (",
        );
        let mut separated = qb.separated(", ");
        for id in post_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY u.username");

        let rows: Vec<(i64, String)> = qb.build_query_as().fetch_all(self.pool).await?;
        for (post_id, username) in rows {
            likes.entry(post_id).or_default().push(username);
        }
        Ok(likes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::{testing, FollowRepo, LikeRepo};

    #[tokio::test]
    async fn create_and_find() {
        let pool = testing::pool().await;
        let alice = testing::user(&pool, "alice").await;
        let repo = PostRepo::new(&pool);

        let post = repo.create(alice.id, "Test post 1").await.unwrap();
        assert_eq!(post.body, "Test post 1");
        assert_eq!(post.author, "alice");
        assert_eq!(post.user_id, alice.id);

        let found = repo.find(post.id).await.unwrap().unwrap();
        assert_eq!(found.timestamp, post.timestamp);
        assert!(repo.find(post.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_keeps_timestamp() {
        let pool = testing::pool().await;
        let alice = testing::user(&pool, "alice").await;
        let repo = PostRepo::new(&pool);
        let post = repo.create(alice.id, "before").await.unwrap();

        repo.update_body(post.id, "after").await.unwrap();
        let found = repo.find(post.id).await.unwrap().unwrap();
        assert_eq!(found.body, "after");
        assert_eq!(found.timestamp, post.timestamp);

        let err = repo.update_body(post.id + 10, "x").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn schema_caps_body_length() {
        let pool = testing::pool().await;
        let alice = testing::user(&pool, "alice").await;

        let err = PostRepo::new(&pool)
            .create(alice.id, &"a".repeat(141))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[tokio::test]
    async fn page_orders_newest_first_with_id_tiebreak() {
        let pool = testing::pool().await;
        let alice = testing::user(&pool, "alice").await;
        let repo = PostRepo::new(&pool);

        let old = repo.create_at(alice.id, "old", "2024-01-01T00:00:00.000000Z").await.unwrap();
        let tie_a = repo.create_at(alice.id, "tie a", "2024-02-01T00:00:00.000000Z").await.unwrap();
        let tie_b = repo.create_at(alice.id, "tie b", "2024-02-01T00:00:00.000000Z").await.unwrap();
        let new = repo.create_at(alice.id, "new", "2024-03-01T00:00:00.000000Z").await.unwrap();

        let ids: Vec<i64> = repo
            .page(FeedSource::All, 10, 0)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![new.id, tie_b.id, tie_a.id, old.id]);

        let second: Vec<i64> = repo
            .page(FeedSource::All, 2, 2)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(second, vec![tie_a.id, old.id]);
    }

    #[tokio::test]
    async fn sources_filter_by_author() {
        let pool = testing::pool().await;
        let a = testing::user(&pool, "a").await;
        let b = testing::user(&pool, "b").await;
        let c = testing::user(&pool, "c").await;
        let repo = PostRepo::new(&pool);
        repo.create(a.id, "from a").await.unwrap();
        repo.create(b.id, "from b").await.unwrap();
        repo.create(c.id, "from c").await.unwrap();
        FollowRepo::new(&pool).insert(a.id, b.id).await.unwrap();

        assert_eq!(repo.count(FeedSource::All).await.unwrap(), 3);
        assert_eq!(repo.count(FeedSource::Following(a.id)).await.unwrap(), 1);
        assert_eq!(repo.count(FeedSource::Following(b.id)).await.unwrap(), 0);
        assert_eq!(repo.count(FeedSource::Profile(c.id)).await.unwrap(), 1);

        let following = repo.page(FeedSource::Following(a.id), 10, 0).await.unwrap();
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].body, "from b");
    }

    #[tokio::test]
    async fn like_usernames_are_grouped_per_post() {
        let pool = testing::pool().await;
        let alice = testing::user(&pool, "alice").await;
        let bob = testing::user(&pool, "bob").await;
        let repo = PostRepo::new(&pool);
        let p1 = repo.create(alice.id, "one").await.unwrap();
        let p2 = repo.create(alice.id, "two").await.unwrap();
        let p3 = repo.create(alice.id, "three").await.unwrap();
        let likes = LikeRepo::new(&pool);
        likes.add(bob.id, p1.id).await.unwrap();
        likes.add(alice.id, p1.id).await.unwrap();
        likes.add(bob.id, p2.id).await.unwrap();

        let map = repo.like_usernames(&[p1.id, p2.id, p3.id]).await.unwrap();
        assert_eq!(map[&p1.id], vec!["alice".to_string(), "bob".to_string()]);
        assert_eq!(map[&p2.id], vec!["bob".to_string()]);
        assert!(!map.contains_key(&p3.id));
        assert!(repo.like_usernames(&[]).await.unwrap().is_empty());
    }
}
