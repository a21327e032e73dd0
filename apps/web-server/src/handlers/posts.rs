//! Post creation, editing and commenting.
//!
//! Mutating handlers open with the authorization predicate: only a post's
//! author may edit it, everyone else is sent to the read-only detail view.

use actix_web::{HttpResponse, web};
use askama::Template;
use uuid::Uuid;

use quill_core::domain::{Comment, Group, Post};

use crate::forms::{CommentForm, FieldError, PostForm};
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views;

#[derive(Template)]
#[template(path = "post_form.html")]
struct PostFormTemplate {
    current_user: Option<String>,
    action: String,
    is_edit: bool,
    text: String,
    group: String,
    image_url: String,
    groups: Vec<Group>,
    errors: Vec<FieldError>,
}

impl PostFormTemplate {
    fn blank(user: &CurrentUser, groups: Vec<Group>) -> Self {
        Self {
            current_user: Some(user.username.clone()),
            action: "/create/".to_string(),
            is_edit: false,
            text: String::new(),
            group: String::new(),
            image_url: String::new(),
            groups,
            errors: vec![],
        }
    }

    fn resubmitted(
        user: &CurrentUser,
        action: String,
        is_edit: bool,
        form: &PostForm,
        groups: Vec<Group>,
        errors: Vec<FieldError>,
    ) -> Self {
        Self {
            current_user: Some(user.username.clone()),
            action,
            is_edit,
            text: form.text.clone(),
            group: form.group().unwrap_or_default().to_string(),
            image_url: form.image_url().unwrap_or_default().to_string(),
            groups,
            errors,
        }
    }
}

/// Resolve the submitted group slug, collecting a field error when it names
/// nothing.
async fn resolve_group(
    state: &AppState,
    form: &PostForm,
    errors: &mut Vec<FieldError>,
) -> AppResult<Option<Group>> {
    let Some(slug) = form.group() else {
        return Ok(None);
    };

    match state.groups.find_by_slug(slug).await? {
        Some(group) => Ok(Some(group)),
        None => {
            errors.push(FieldError::new("group", format!("Unknown group `{slug}`")));
            Ok(None)
        }
    }
}

/// GET /create/
pub async fn create_form(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> AppResult<HttpResponse> {
    let groups = state.groups.list().await?;
    views::render(&PostFormTemplate::blank(&user, groups))
}

/// POST /create/
pub async fn create_submit(
    state: web::Data<AppState>,
    user: CurrentUser,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let mut errors = form.validate();
    let group = resolve_group(&state, &form, &mut errors).await?;

    if !errors.is_empty() {
        let groups = state.groups.list().await?;
        return views::render(&PostFormTemplate::resubmitted(
            &user,
            "/create/".to_string(),
            false,
            &form,
            groups,
            errors,
        ));
    }

    let post = Post::new(
        user.id,
        form.text.clone(),
        group.map(|g| g.id),
        form.image_url().map(str::to_string),
    );
    let post = state.posts.insert(post).await?;

    tracing::info!(post_id = %post.id, author = %user.username, "Post created");
    Ok(views::redirect_to(format!("/profile/{}/", user.username)))
}

/// GET /posts/{id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(*id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post `{id}`")))?;

    if post.author_id != user.id {
        return Ok(views::redirect_to(format!("/posts/{}/", post.id)));
    }

    let groups = state.groups.list().await?;
    let selected = post
        .group_id
        .and_then(|gid| groups.iter().find(|g| g.id == gid))
        .map(|g| g.slug.clone())
        .unwrap_or_default();

    views::render(&PostFormTemplate {
        current_user: Some(user.username.clone()),
        action: format!("/posts/{}/edit/", post.id),
        is_edit: true,
        text: post.text,
        group: selected,
        image_url: post.image_url.unwrap_or_default(),
        groups,
        errors: vec![],
    })
}

/// POST /posts/{id}/edit/
pub async fn edit_submit(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<Uuid>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let mut post = state
        .posts
        .find_by_id(*id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post `{id}`")))?;

    if post.author_id != user.id {
        return Ok(views::redirect_to(format!("/posts/{}/", post.id)));
    }

    let form = form.into_inner();
    let mut errors = form.validate();
    let group = resolve_group(&state, &form, &mut errors).await?;

    if !errors.is_empty() {
        let groups = state.groups.list().await?;
        return views::render(&PostFormTemplate::resubmitted(
            &user,
            format!("/posts/{}/edit/", post.id),
            true,
            &form,
            groups,
            errors,
        ));
    }

    post.edit(
        form.text.clone(),
        group.map(|g| g.id),
        form.image_url().map(str::to_string),
    );
    let post = state.posts.update(post).await?;

    tracing::info!(post_id = %post.id, author = %user.username, "Post edited");
    Ok(views::redirect_to(format!("/posts/{}/", post.id)))
}

/// POST /posts/{id}/comment
///
/// A blank comment is dropped silently; either way the client lands back on
/// the detail page.
pub async fn add_comment(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<Uuid>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(*id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post `{id}`")))?;

    let form = form.into_inner();
    if form.validate().is_empty() {
        let comment = Comment::new(post.id, user.id, form.text);
        state.comments.insert(comment).await?;
        tracing::debug!(post_id = %post.id, author = %user.username, "Comment added");
    }

    Ok(views::redirect_to(format!("/posts/{}/", post.id)))
}
