//! Registration, login and logout pages.

use actix_web::{HttpResponse, http::header, web};
use askama::Template;
use serde::Deserialize;

use quill_core::domain::User;

use crate::forms::{FieldError, LoginForm, SignupForm};
use crate::middleware::auth::{removal_cookie, session_cookie};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views;

#[derive(Template)]
#[template(path = "signup.html")]
struct SignupTemplate {
    current_user: Option<String>,
    username: String,
    email: String,
    errors: Vec<FieldError>,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    current_user: Option<String>,
    username: String,
    next: String,
    errors: Vec<FieldError>,
}

/// Destination the visitor was headed to before being sent here.
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

/// GET /auth/signup/
pub async fn signup_form() -> AppResult<HttpResponse> {
    views::render(&SignupTemplate {
        current_user: None,
        username: String::new(),
        email: String::new(),
        errors: vec![],
    })
}

/// POST /auth/signup/
pub async fn signup_submit(
    state: web::Data<AppState>,
    form: web::Form<SignupForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let mut errors = form.validate();
    if errors.is_empty()
        && state
            .users
            .find_by_username(&form.username)
            .await?
            .is_some()
    {
        errors.push(FieldError::new("username", "Username already taken"));
    }

    if !errors.is_empty() {
        return views::render(&SignupTemplate {
            current_user: None,
            username: form.username,
            email: form.email,
            errors,
        });
    }

    let password_hash = state.passwords.hash(&form.password)?;
    let user = match User::new(form.username.clone(), form.email.clone(), password_hash) {
        Ok(user) => user,
        Err(e) => {
            return views::render(&SignupTemplate {
                current_user: None,
                username: form.username,
                email: form.email,
                errors: vec![FieldError::new("username", e.to_string())],
            });
        }
    };
    let user = state.users.insert(user).await?;

    tracing::info!(username = %user.username, "User registered");

    let token = state.sessions.issue(user.id, &user.username)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(session_cookie(token, state.sessions.ttl_seconds()))
        .finish())
}

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> AppResult<HttpResponse> {
    views::render(&LoginTemplate {
        current_user: None,
        username: String::new(),
        next: query.next.clone().unwrap_or_default(),
        errors: vec![],
    })
}

fn failed_login(form: &LoginForm) -> LoginTemplate {
    LoginTemplate {
        current_user: None,
        username: form.username.clone(),
        next: form.next.clone().unwrap_or_default(),
        errors: vec![FieldError::new("password", "Invalid username or password")],
    }
}

/// POST /auth/login/
pub async fn login_submit(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let Some(user) = state.users.find_by_username(&form.username).await? else {
        return views::render(&failed_login(&form));
    };

    if !state.passwords.verify(&form.password, &user.password_hash)? {
        tracing::debug!(username = %form.username, "Password mismatch");
        return views::render(&failed_login(&form));
    }

    tracing::info!(username = %user.username, "User logged in");

    let token = state.sessions.issue(user.id, &user.username)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, form.next().to_string()))
        .cookie(session_cookie(token, state.sessions.ttl_seconds()))
        .finish())
}

/// GET /auth/logout/
pub async fn logout() -> AppResult<HttpResponse> {
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(removal_cookie())
        .finish())
}
