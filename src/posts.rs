use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::SqlitePool;

use crate::app_state::AppState;
use crate::auth::require_user;
use crate::config::MAX_POST_LENGTH;
use crate::core::errors::ApiError;
use crate::core::helpers::parse_json;
use crate::core::query_params::{get_int, parse_int, parse_query_params};
use crate::models::models::{PostBody, PostPage, PostView};
use crate::pagination::Paginator;
use crate::repo::{FeedSource, PostRepo, StoreError, UserRepo};

/// One page of `source`, newest first, with its likes expanded.
///
/// `page` is 1-based; values outside `1..=total_pages` are clamped and the
/// returned `current_page` reports the page actually served.
pub async fn get_paginated_posts(
    pool: &SqlitePool,
    page: i64,
    per_page: i64,
    source: FeedSource,
) -> Result<PostPage, StoreError> {
    let posts = PostRepo::new(pool);
    let paginator = Paginator::new(posts.count(source).await?, per_page);
    let page = paginator.clamp(page);

    let rows = posts.page(source, paginator.per_page(), paginator.offset(page)).await?;
    let ids: Vec<i64> = rows.iter().map(|p| p.id).collect();
    let mut likes = posts.like_usernames(&ids).await?;

    let posts = rows
        .into_iter()
        .map(|p| {
            let liked_by = likes.remove(&p.id).unwrap_or_default();
            PostView::new(p, liked_by)
        })
        .collect();

    Ok(PostPage {
        posts,
        pagination: paginator.page_info(page),
    })
}

/// The single authority on what a post body may contain.
pub fn validate_post_body(payload: PostBody) -> Result<String, ApiError> {
    let body = match payload.body {
        Some(b) if !b.trim().is_empty() => b,
        _ => return Err(ApiError::BadRequest("Message missing a 'body' parameter.".to_string())),
    };

    if body.chars().count() > MAX_POST_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Post body exceeds the maximum length of {} characters.",
            MAX_POST_LENGTH
        )));
    }

    Ok(body)
}

/// Page number from the `{page}` path segment, else `?page=`, else 1.
fn requested_page(req: &HttpRequest) -> i64 {
    if let Some(page) = req.match_info().get("page") {
        return parse_int(page).unwrap_or(1);
    }
    let params = parse_query_params(req.query_string());
    get_int(&params, "page", 1)
}

pub async fn list_posts(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let page = get_paginated_posts(&state.pool, requested_page(&req), state.posts_per_page, FeedSource::All).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn following_posts(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &state.pool).await?;

    let page = get_paginated_posts(
        &state.pool,
        requested_page(&req),
        state.posts_per_page,
        FeedSource::Following(user.id),
    )
    .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn profile_posts(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let username = req.match_info().get("username").unwrap_or_default();
    let profile_user = UserRepo::new(&state.pool)
        .find_by_username(username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    let page = get_paginated_posts(
        &state.pool,
        requested_page(&req),
        state.posts_per_page,
        FeedSource::Profile(profile_user.id),
    )
    .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn create_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &state.pool).await?;
    let payload: PostBody = parse_json(&body)?;
    let text = validate_post_body(payload)?;

    let post = PostRepo::new(&state.pool).create(user.id, &text).await?;
    tracing::debug!(post_id = post.id, user_id = user.id, "created post");

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Post created successfully.",
        "post": PostView::new(post, Vec::new())
    })))
}

/// Checks run in order: post exists, payload is valid, requester owns the
/// post, body actually changes.
pub async fn edit_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &state.pool).await?;
    let posts = PostRepo::new(&state.pool);

    let mut post = posts
        .find(path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found.".to_string()))?;

    let payload: PostBody = parse_json(&body)?;
    let text = validate_post_body(payload)?;

    if post.user_id != user.id {
        return Err(ApiError::Forbidden("You are not authorized to edit this post.".to_string()));
    }

    if post.body == text {
        return Err(ApiError::BadRequest("No changes were made to the post.".to_string()));
    }

    posts.update_body(post.id, &text).await?;
    post.body = text;

    let likes = posts.like_usernames(&[post.id]).await?.remove(&post.id).unwrap_or_default();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post updated successfully.",
        "post": PostView::new(post, likes)
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::{testing, FollowRepo, LikeRepo};

    fn payload(body: &str) -> PostBody {
        PostBody { body: Some(body.to_string()) }
    }

    #[test]
    fn body_length_boundary() {
        assert!(validate_post_body(payload(&"a".repeat(140))).is_ok());
        assert!(validate_post_body(payload(&"a".repeat(141))).is_err());
        // Counted in characters, not bytes.
        assert!(validate_post_body(payload(&"é".repeat(140))).is_ok());
    }

    #[test]
    fn missing_or_blank_body_is_rejected() {
        assert!(validate_post_body(PostBody { body: None }).is_err());
        assert!(validate_post_body(payload("")).is_err());
        assert!(validate_post_body(payload("   ")).is_err());
    }

    #[tokio::test]
    async fn following_feed_scenario() {
        let pool = testing::pool().await;
        let a = testing::user(&pool, "a").await;
        let b = testing::user(&pool, "b").await;
        PostRepo::new(&pool).create(b.id, "hi").await.unwrap();
        FollowRepo::new(&pool).insert(a.id, b.id).await.unwrap();

        let page = get_paginated_posts(&pool, 1, 10, FeedSource::Following(a.id)).await.unwrap();
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].body, "hi");
        assert_eq!(page.posts[0].user, "b");
        assert!(!page.pagination.has_next);
        assert!(!page.pagination.has_previous);
    }

    #[tokio::test]
    async fn page_beyond_last_returns_last_page() {
        let pool = testing::pool().await;
        let a = testing::user(&pool, "a").await;
        let posts = PostRepo::new(&pool);
        for i in 0..25 {
            posts.create(a.id, &format!("post {}", i)).await.unwrap();
        }

        let last = get_paginated_posts(&pool, 3, 10, FeedSource::All).await.unwrap();
        let beyond = get_paginated_posts(&pool, 99, 10, FeedSource::All).await.unwrap();
        assert_eq!(beyond, last);
        assert_eq!(beyond.posts.len(), 5);
        assert_eq!(beyond.pagination.current_page, 3);
        assert_eq!(beyond.pagination.total_pages, 3);
        assert!(!beyond.pagination.has_next);
        assert!(beyond.pagination.has_previous);
    }

    #[tokio::test]
    async fn all_feed_is_newest_first() {
        let pool = testing::pool().await;
        let a = testing::user(&pool, "a").await;
        let b = testing::user(&pool, "b").await;
        let posts = PostRepo::new(&pool);
        posts.create_at(a.id, "first", "2024-01-01T10:00:00.000000Z").await.unwrap();
        posts.create_at(b.id, "third", "2024-01-03T10:00:00.000000Z").await.unwrap();
        posts.create_at(a.id, "second", "2024-01-02T10:00:00.000000Z").await.unwrap();

        let page = get_paginated_posts(&pool, 1, 10, FeedSource::All).await.unwrap();
        let bodies: Vec<&str> = page.posts.iter().map(|p| p.body.as_str()).collect();
        assert_eq!(bodies, vec!["third", "second", "first"]);
        assert_eq!(page.posts[0].timestamp, "Jan 03 2024, 10:00 AM");
    }

    #[tokio::test]
    async fn empty_feed_has_one_empty_page() {
        let pool = testing::pool().await;
        let page = get_paginated_posts(&pool, 1, 10, FeedSource::All).await.unwrap();
        assert!(page.posts.is_empty());
        assert_eq!(page.pagination.total_pages, 1);
        assert_eq!(page.pagination.current_page, 1);
    }

    #[tokio::test]
    async fn profile_feed_includes_likes() {
        let pool = testing::pool().await;
        let a = testing::user(&pool, "a").await;
        let b = testing::user(&pool, "b").await;
        let posts = PostRepo::new(&pool);
        let mine = posts.create(a.id, "mine").await.unwrap();
        posts.create(b.id, "theirs").await.unwrap();
        LikeRepo::new(&pool).add(b.id, mine.id).await.unwrap();

        let page = get_paginated_posts(&pool, 1, 10, FeedSource::Profile(a.id)).await.unwrap();
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].likes, vec!["b".to_string()]);
    }
}
