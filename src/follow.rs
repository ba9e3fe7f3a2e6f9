use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use sqlx::SqlitePool;

use crate::app_state::AppState;
use crate::auth::require_user;
use crate::core::errors::ApiError;
use crate::core::helpers::message;
use crate::models::models::User;
use crate::repo::{FollowRepo, StoreError, UserRepo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Followed,
    AlreadyFollowing,
}

/// Creates the follow edge. The `exists` check only short-cuts the common
/// case; a concurrent duplicate still lands on the unique constraint and is
/// reported as `AlreadyFollowing`.
pub async fn follow_user(pool: &SqlitePool, follower_id: i64, following_id: i64) -> Result<FollowOutcome, StoreError> {
    let follows = FollowRepo::new(pool);
    if follower_id != following_id && follows.exists(follower_id, following_id).await? {
        return Ok(FollowOutcome::AlreadyFollowing);
    }

    insert_follow(&follows, follower_id, following_id).await
}

async fn insert_follow(follows: &FollowRepo<'_>, follower_id: i64, following_id: i64) -> Result<FollowOutcome, StoreError> {
    match follows.insert(follower_id, following_id).await {
        Ok(()) => Ok(FollowOutcome::Followed),
        Err(StoreError::Duplicate) => {
            tracing::debug!(follower_id, following_id, "follow raced with an identical insert");
            Ok(FollowOutcome::AlreadyFollowing)
        }
        Err(e) => Err(e),
    }
}

/// Removes the edge if present; returns whether one existed.
pub async fn unfollow_user(pool: &SqlitePool, follower_id: i64, following_id: i64) -> Result<bool, StoreError> {
    FollowRepo::new(pool).delete(follower_id, following_id).await
}

async fn load_target(pool: &SqlitePool, username: &str) -> Result<User, ApiError> {
    UserRepo::new(pool)
        .find_by_username(username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))
}

// === HTTP Handlers ===

pub async fn handle_follow(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &state.pool).await?;
    let target = load_target(&state.pool, &path).await?;

    follow_user(&state.pool, user.id, target.id).await?;

    Ok(message(StatusCode::OK, "Successfully followed."))
}

pub async fn handle_unfollow(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &state.pool).await?;
    let target = load_target(&state.pool, &path).await?;

    unfollow_user(&state.pool, user.id, target.id).await?;

    Ok(message(StatusCode::OK, "Successfully unfollowed."))
}
