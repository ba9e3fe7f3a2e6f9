use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::core::helpers::hash_password;
use crate::repo::{FollowRepo, PostRepo, StoreError, UserRepo};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL DEFAULT '',
        password_hash TEXT NOT NULL,
        date_joined TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS follows (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        follower_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        following_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        UNIQUE (follower_id, following_id),
        CHECK (follower_id <> following_id)
    )",
    "CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        body TEXT NOT NULL CHECK (length(body) <= 140),
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        timestamp TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS likes (
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
        PRIMARY KEY (user_id, post_id)
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS posts_timestamp_idx ON posts (timestamp DESC, id DESC)",
    "CREATE INDEX IF NOT EXISTS posts_user_idx ON posts (user_id)",
    "CREATE INDEX IF NOT EXISTS follows_following_idx ON follows (following_id)",
    "CREATE INDEX IF NOT EXISTS likes_post_idx ON likes (post_id)",
];

/// Opens the pool and makes sure the schema exists.
///
/// In-memory databases live inside a single connection, so their pool is
/// pinned to exactly one connection that is never recycled.
pub async fn connect(url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .foreign_keys(true)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    let in_memory = url.contains(":memory:") || url.contains("mode=memory");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(8)
    };

    let pool = pool_options.connect_with(options).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    for statement in SCHEMA {
        sqlx::query(*statement).execute(pool).await?;
    }
    Ok(())
}

/// Seeds `test`, `alice` and `bob` (password = username) with a few posts,
/// plus `test` following `bob`. Safe to call repeatedly.
pub async fn init_demo_data(pool: &SqlitePool) -> anyhow::Result<()> {
    let users = UserRepo::new(pool);
    let posts = PostRepo::new(pool);

    let demo: [(&str, &[&str]); 3] = [
        ("test", &["This is my first post on the network!"]),
        ("alice", &[
            "Welcome to my page! Excited to share thoughts here.",
            "Just finished an amazing project. Feeling productive today!",
        ]),
        ("bob", &["Hey everyone! Just joined, looking forward to connecting with you all."]),
    ];

    let mut ids = Vec::with_capacity(demo.len());
    for (username, bodies) in demo {
        if let Some(existing) = users.find_by_username(username).await? {
            ids.push(existing.id);
            continue;
        }

        let user = users
            .create(username, &format!("{}@example.com", username), &hash_password(username)?)
            .await?;
        for body in bodies {
            posts.create(user.id, body).await?;
        }
        tracing::info!(username, "seeded demo user");
        ids.push(user.id);
    }

    match FollowRepo::new(pool).insert(ids[0], ids[2]).await {
        Ok(()) | Err(StoreError::Duplicate) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
