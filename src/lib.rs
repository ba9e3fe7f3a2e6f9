//! A small social network: users post short messages, like posts and
//! follow each other. Everything is served from one SQLite database through
//! a paginated JSON API under `/api`, plus a thin server-rendered shell.

use actix_web::web;

pub mod app_state;
pub mod auth;
pub mod config;
pub mod core;
pub mod follow;
pub mod likes;
pub mod models;
pub mod pagination;
pub mod posts;
pub mod repo;
pub mod templates;
pub mod users;

pub use app_state::AppState;

/// Registers every route. Callers supply `web::Data<AppState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/register", web::post().to(users::create_user))
            .route("/login", web::post().to(auth::login_user))
            .route("/logout", web::post().to(auth::logout_user))
            .route("/post", web::post().to(posts::create_post))
            .route("/posts", web::get().to(posts::list_posts))
            .route("/posts/{page}", web::get().to(posts::list_posts))
            .route("/posts/{id}/edit", web::post().to(posts::edit_post))
            .route("/following", web::get().to(posts::following_posts))
            .route("/following/{page}", web::get().to(posts::following_posts))
            .route("/profile/{username}", web::get().to(users::get_profile))
            .route("/profile/{username}/{page}", web::get().to(posts::profile_posts))
            .route("/follow/{username}", web::post().to(follow::handle_follow))
            .route("/unfollow/{username}", web::post().to(follow::handle_unfollow))
            .route("/like/{id}", web::post().to(likes::like_post))
            .route("/unlike/{id}", web::post().to(likes::unlike_post)),
    )
    .route("/static/{path:.*}", web::get().to(crate::core::static_server::serve_static))
    .route("/profile/{username}", web::get().to(templates::render_user_profile))
    .route("/", web::get().to(templates::render_page))
    .route("/home", web::get().to(templates::render_page))
    .route("/following", web::get().to(templates::render_page))
    .route("/login", web::get().to(templates::render_page))
    .route("/register", web::get().to(templates::render_page));
}
