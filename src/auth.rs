use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use sqlx::SqlitePool;

use crate::app_state::AppState;
use crate::config::token_expiration_hours;
use crate::core::errors::ApiError;
use crate::core::helpers::{message, parse_json, verify_password};
use crate::models::models::{LoginRequest, User};
use crate::repo::{SessionRepo, UserRepo};

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn login_user(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let creds: LoginRequest = parse_json(&body)?;

    let user = UserRepo::new(&state.pool).find_by_username(&creds.username).await?;
    let user = match user {
        Some(u) if verify_password(&creds.password, &u.password_hash) => u,
        _ => {
            tracing::debug!(username = %creds.username, "rejected login");
            return Err(ApiError::InvalidCredentials);
        }
    };

    let token = SessionRepo::new(&state.pool).create(user.id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "token": token,
        "user_id": user.id
    })))
}

pub async fn logout_user(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let token = bearer_token(&req).ok_or(ApiError::Unauthorized)?;
    SessionRepo::new(&state.pool).delete(token).await?;

    Ok(message(StatusCode::OK, "Logged out successfully."))
}

/// Resolves the bearer token to a user. Unknown or expired tokens yield
/// `None`, the same as a request without credentials.
pub async fn validate_token(req: &HttpRequest, pool: &SqlitePool) -> Result<Option<User>, ApiError> {
    let token = match bearer_token(req) {
        Some(t) => t,
        None => return Ok(None),
    };

    let session = match SessionRepo::new(pool).find(token).await? {
        Some(s) => s,
        None => return Ok(None),
    };

    // Unreadable creation times count as expired
    let created = match chrono::DateTime::parse_from_rfc3339(&session.created_at) {
        Ok(created) => created,
        Err(_) => {
            tracing::warn!(user_id = session.user_id, "session has an unreadable creation time");
            return Ok(None);
        }
    };
    let age_hours = (chrono::Utc::now() - created.with_timezone(&chrono::Utc)).num_hours();
    if age_hours > token_expiration_hours() {
        return Ok(None);
    }

    Ok(UserRepo::new(pool).find_by_id(session.user_id).await?)
}

pub async fn require_user(req: &HttpRequest, pool: &SqlitePool) -> Result<User, ApiError> {
    validate_token(req, pool).await?.ok_or(ApiError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use crate::repo::testing;

    #[actix_web::test]
    async fn missing_header_is_anonymous() {
        let pool = testing::pool().await;
        let req = TestRequest::default().to_http_request();
        assert!(validate_token(&req, &pool).await.unwrap().is_none());
        assert!(matches!(require_user(&req, &pool).await, Err(ApiError::Unauthorized)));
    }

    #[actix_web::test]
    async fn valid_token_resolves_user() {
        let pool = testing::pool().await;
        let alice = testing::user(&pool, "alice").await;
        let token = SessionRepo::new(&pool).create(alice.id).await.unwrap();

        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();
        let user = require_user(&req, &pool).await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[actix_web::test]
    async fn expired_token_is_anonymous() {
        let pool = testing::pool().await;
        let alice = testing::user(&pool, "alice").await;
        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES ('old', ?, '2000-01-01T00:00:00.000000Z')")
            .bind(alice.id)
            .execute(&pool)
            .await
            .unwrap();

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer old"))
            .to_http_request();
        assert!(validate_token(&req, &pool).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn unreadable_session_time_is_anonymous() {
        let pool = testing::pool().await;
        let alice = testing::user(&pool, "alice").await;
        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES ('garbled', ?, 'yesterday')")
            .bind(alice.id)
            .execute(&pool)
            .await
            .unwrap();

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer garbled"))
            .to_http_request();
        assert!(validate_token(&req, &pool).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn non_bearer_scheme_is_ignored() {
        let pool = testing::pool().await;
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic Zm9vOmJhcg=="))
            .to_http_request();
        assert!(validate_token(&req, &pool).await.unwrap().is_none());
    }
}
