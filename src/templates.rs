use actix_web::{web, HttpRequest, HttpResponse};

use crate::app_state::AppState;
use crate::core::errors::ApiError;
use crate::core::static_server::Assets;
use crate::repo::UserRepo;

/// Fills the page shell. The browser script picks the view from
/// `data-view` and fetches everything else from the JSON API.
fn render_shell(view: &str, title: &str, profile: Option<&str>) -> Result<String, ApiError> {
    let template = Assets::get("index.html")
        .ok_or_else(|| anyhow::anyhow!("Page template not found"))?
        .data
        .to_vec();

    let mut html = String::from_utf8(template).map_err(anyhow::Error::from)?;

    html = html.replace("PAGE_TITLE", &html_escape::encode_text(title));
    html = html.replace("PAGE_VIEW", &html_escape::encode_double_quoted_attribute(view));
    html = html.replace(
        "PROFILE_USERNAME",
        &html_escape::encode_double_quoted_attribute(profile.unwrap_or_default()),
    );

    Ok(html)
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// `/`, `/home`, `/following`, `/login` and `/register`.
pub async fn render_page(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let view = match req.path().trim_matches('/') {
        "" | "home" => "home",
        "following" => "following",
        "login" => "login",
        "register" => "register",
        _ => return Err(ApiError::NotFound("Page not found".to_string())),
    };
    let title = match view {
        "home" => "All Posts",
        "following" => "Following",
        "login" => "Log In",
        _ => "Register",
    };

    Ok(html(render_shell(view, title, None)?))
}

pub async fn render_user_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = UserRepo::new(&state.pool)
        .find_by_username(&path)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    Ok(html(render_shell("profile", &user.username, Some(user.username.as_str()))?))
}
