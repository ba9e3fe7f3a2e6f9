use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use sqlx::SqlitePool;

use crate::app_state::AppState;
use crate::auth::require_user;
use crate::core::errors::ApiError;
use crate::core::helpers::message;
use crate::repo::{LikeRepo, PostRepo};

async fn ensure_post(pool: &SqlitePool, post_id: i64) -> Result<(), ApiError> {
    PostRepo::new(pool)
        .find(post_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound("Post not found.".to_string()))
}

/// Liking an already-liked post succeeds with the same response.
pub async fn like_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &state.pool).await?;
    let post_id = path.into_inner();
    ensure_post(&state.pool, post_id).await?;

    if !LikeRepo::new(&state.pool).add(user.id, post_id).await? {
        tracing::debug!(user_id = user.id, post_id, "post already liked");
    }

    Ok(message(StatusCode::OK, "Post liked successfully."))
}

/// Unliking requires an existing like; unlike `like_post` this is not idempotent.
pub async fn unlike_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &state.pool).await?;
    let post_id = path.into_inner();
    ensure_post(&state.pool, post_id).await?;

    if !LikeRepo::new(&state.pool).remove(user.id, post_id).await? {
        return Err(ApiError::BadRequest("You have not liked this post.".to_string()));
    }

    Ok(message(StatusCode::OK, "Post unliked successfully."))
}
