//! Authentication extractors.
//!
//! The session is a signed token in an HTTP-only cookie. Handlers declare
//! their requirement through the extractor they take: `CurrentUser` for
//! login-required routes, `MaybeUser` where the page merely adapts to the
//! viewer.

use actix_web::cookie::{Cookie, time::Duration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "quill_session";

/// Authenticated user identity extractor.
///
/// Use this in handlers to require a login:
/// ```ignore
/// async fn create_form(user: CurrentUser) -> AppResult<HttpResponse> { ... }
/// ```
/// Requests without a valid session are redirected to the login page with
/// the original path preserved in `next`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: uuid::Uuid,
    pub username: String,
}

/// Extraction failure: a 302 to the login page.
#[derive(Debug)]
pub struct LoginRedirect {
    next: String,
}

impl LoginRedirect {
    fn for_path(path: &str) -> Self {
        Self {
            next: path.to_owned(),
        }
    }

    pub fn location(&self) -> String {
        format!("/auth/login/?next={}", self.next)
    }
}

impl std::fmt::Display for LoginRedirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "login required, next={}", self.next)
    }
}

impl actix_web::ResponseError for LoginRedirect {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::FOUND
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::Found()
            .insert_header((header::LOCATION, self.location()))
            .finish()
    }
}

impl FromRequest for CurrentUser {
    type Error = LoginRedirect;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state,
            None => {
                tracing::error!("AppState not found in app data");
                return ready(Err(LoginRedirect::for_path(req.path())));
            }
        };

        let Some(cookie) = req.cookie(SESSION_COOKIE) else {
            return ready(Err(LoginRedirect::for_path(req.path())));
        };

        match state.sessions.verify(cookie.value()) {
            Ok(claims) => ready(Ok(CurrentUser {
                id: claims.user_id,
                username: claims.username,
            })),
            Err(e) => {
                tracing::debug!("Rejecting session cookie: {}", e);
                ready(Err(LoginRedirect::for_path(req.path())))
            }
        }
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct MaybeUser(pub Option<CurrentUser>);

impl MaybeUser {
    /// Username for the page chrome, if logged in.
    pub fn username(&self) -> Option<String> {
        self.0.as_ref().map(|u| u.username.clone())
    }
}

impl FromRequest for MaybeUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        match CurrentUser::from_request(req, payload).into_inner() {
            Ok(user) => ready(Ok(MaybeUser(Some(user)))),
            Err(_) => ready(Ok(MaybeUser(None))),
        }
    }
}

/// Cookie carrying a freshly issued session token.
pub fn session_cookie(token: String, ttl_seconds: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .max_age(Duration::seconds(ttl_seconds))
        .finish()
}

/// Expired cookie that clears the session in the browser.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(Duration::ZERO)
        .finish()
}
