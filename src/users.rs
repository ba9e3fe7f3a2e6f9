use std::sync::OnceLock;

use actix_web::{web, HttpRequest, HttpResponse};
use regex::Regex;
use sqlx::SqlitePool;

use crate::app_state::AppState;
use crate::auth::validate_token;
use crate::config::*;
use crate::core::errors::ApiError;
use crate::core::helpers::{hash_password, parse_json};
use crate::core::query_params::{get_bool_flag, parse_query_params};
use crate::models::models::{
    PostView, ProfileResponse, ProfileUser, RegisterRequest, User, UserSummary, UserView,
};
use crate::repo::{FollowRepo, PostRepo, SessionRepo, StoreError, UserRepo};

fn username_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.@+-]+$").expect("Regex should compile")
    })
}

fn email_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Regex should compile")
    })
}

fn validate_registration(form: &RegisterRequest) -> Result<(), ApiError> {
    let username = form.username.as_str();
    if username.is_empty() {
        return Err(ApiError::BadRequest("Username is required.".to_string()));
    }
    let len = username.chars().count();
    if len < MIN_USERNAME_LENGTH || len > MAX_USERNAME_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Username must be {}-{} characters.",
            MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
        )));
    }
    if !username_regex().is_match(username) {
        return Err(ApiError::BadRequest(
            "Username may only contain letters, digits and @/./+/-/_ characters.".to_string(),
        ));
    }
    if !form.email.is_empty() && !email_regex().is_match(&form.email) {
        return Err(ApiError::BadRequest("Enter a valid email address.".to_string()));
    }
    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters.",
            MIN_PASSWORD_LENGTH
        )));
    }
    if form.password != form.confirmation {
        return Err(ApiError::BadRequest("Passwords must match.".to_string()));
    }
    Ok(())
}

/// Registers a user and logs them straight in.
pub async fn create_user(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let form: RegisterRequest = parse_json(&body)?;
    validate_registration(&form)?;

    let password_hash = hash_password(&form.password)?;
    let user = match UserRepo::new(&state.pool)
        .create(&form.username, &form.email, &password_hash)
        .await
    {
        Ok(u) => u,
        Err(StoreError::Duplicate) => {
            return Err(ApiError::Conflict("Username already taken.".to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    let token = SessionRepo::new(&state.pool).create(user.id).await?;
    tracing::info!(user_id = user.id, username = %user.username, "registered user");

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Registered successfully.",
        "user_id": user.id,
        "token": token
    })))
}

pub async fn user_summary(pool: &SqlitePool, user: &User) -> Result<UserSummary, StoreError> {
    let users = UserRepo::new(pool);
    Ok(UserSummary {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        following: users.following_count(user.id).await?,
        followers: users.follower_count(user.id).await?,
    })
}

/// Summary plus liked-post authors and the newest `PROFILE_POSTS_LIMIT` posts.
pub async fn user_view(pool: &SqlitePool, user: &User) -> Result<UserView, StoreError> {
    let summary = user_summary(pool, user).await?;
    let likes = UserRepo::new(pool).liked_post_authors(user.id).await?;

    let posts = PostRepo::new(pool);
    let rows = posts.by_user(user.id, PROFILE_POSTS_LIMIT).await?;
    let ids: Vec<i64> = rows.iter().map(|p| p.id).collect();
    let mut like_map = posts.like_usernames(&ids).await?;
    let posts = rows
        .into_iter()
        .map(|p| {
            let likes = like_map.remove(&p.id).unwrap_or_default();
            PostView::new(p, likes)
        })
        .collect();

    Ok(UserView { summary, likes, posts })
}

pub async fn get_profile(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let username = path.into_inner();
    let profile_user = UserRepo::new(&state.pool)
        .find_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    let is_following = match validate_token(&req, &state.pool).await? {
        Some(viewer) => FollowRepo::new(&state.pool).exists(viewer.id, profile_user.id).await?,
        None => false,
    };

    let params = parse_query_params(req.query_string());
    let user = if get_bool_flag(&params, "expand") {
        ProfileUser::Expanded(user_view(&state.pool, &profile_user).await?)
    } else {
        ProfileUser::Summary(user_summary(&state.pool, &profile_user).await?)
    };

    Ok(HttpResponse::Ok().json(ProfileResponse { user, is_following }))
}
