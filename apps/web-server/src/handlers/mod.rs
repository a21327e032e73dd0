//! HTTP handlers and route configuration.

pub mod auth;
pub mod follows;
pub mod pages;
pub mod posts;

#[cfg(test)]
mod tests;

use actix_web::web;
use serde::Deserialize;

use quill_core::pagination::PageRequest;

/// The `?page=` query parameter. Anything unparsable falls back to page 1;
/// out-of-range numbers are clamped later, against the actual page count.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    pub fn request(&self, per_page: u64) -> PageRequest {
        let number = self
            .page
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
        PageRequest::new(number, per_page)
    }
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(pages::index))
        .route("/follow/", web::get().to(follows::follow_index))
        .route("/create/", web::get().to(posts::create_form))
        .route("/create/", web::post().to(posts::create_submit))
        .route("/group/{slug}/", web::get().to(pages::group_posts))
        .route("/profile/{username}/", web::get().to(pages::profile))
        .route(
            "/profile/{username}/follow",
            web::get().to(follows::profile_follow),
        )
        .route(
            "/profile/{username}/unfollow",
            web::get().to(follows::profile_unfollow),
        )
        .route("/posts/{id}/", web::get().to(pages::post_detail))
        .route("/posts/{id}/edit/", web::get().to(posts::edit_form))
        .route("/posts/{id}/edit/", web::post().to(posts::edit_submit))
        .route("/posts/{id}/comment", web::post().to(posts::add_comment))
        .service(
            web::scope("/auth")
                .route("/signup/", web::get().to(auth::signup_form))
                .route("/signup/", web::post().to(auth::signup_submit))
                .route("/login/", web::get().to(auth::login_form))
                .route("/login/", web::post().to(auth::login_submit))
                .route("/logout/", web::get().to(auth::logout)),
        );
}
