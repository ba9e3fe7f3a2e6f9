use serde::{Serialize, Deserialize};
use sqlx::FromRow;

use crate::pagination::PageInfo;

// === Rows ===

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub date_joined: String,
}

/// A post joined with its author's username.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub body: String,
    pub user_id: i64,
    pub author: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: String,
}

// === Serialized views ===

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostView {
    pub id: i64,
    pub body: String,
    pub user: String,
    pub timestamp: String,
    pub likes: Vec<String>,
}

impl PostView {
    pub fn new(post: Post, likes: Vec<String>) -> Self {
        PostView {
            id: post.id,
            timestamp: display_timestamp(&post.timestamp),
            body: post.body,
            user: post.author,
            likes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub following: i64,
    pub followers: i64,
}

/// Summary plus the eager expansion of likes and (bounded) posts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserView {
    #[serde(flatten)]
    pub summary: UserSummary,
    pub likes: Vec<String>,
    pub posts: Vec<PostView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProfileUser {
    Expanded(UserView),
    Summary(UserSummary),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: ProfileUser,
    pub is_following: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostPage {
    pub posts: Vec<PostView>,
    pub pagination: PageInfo,
}

// === Request payloads ===

#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Renders a stored RFC 3339 timestamp as e.g. `Mar 04 2024, 09:15 PM`.
pub fn display_timestamp(stored: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(stored) {
        Ok(ts) => ts.format("%b %d %Y, %I:%M %p").to_string(),
        Err(_) => stored.to_string(),
    }
}
