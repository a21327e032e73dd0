//! View models handed to the askama templates, and small response helpers.

use std::collections::HashMap;

use actix_web::{HttpResponse, http::header};
use askama::Template;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use quill_core::domain::{Comment, Group, Post};
use quill_core::pagination::Page;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// One post as shown in a feed or on the detail page.
pub struct PostView {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
}

/// One comment under a post.
pub struct CommentView {
    pub author: String,
    pub text: String,
    pub created_at: String,
}

/// Pagination metadata for the shared template include.
pub struct PageMeta {
    pub number: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_number: u64,
    pub previous_number: u64,
}

impl PageMeta {
    pub fn of<T>(page: &Page<T>) -> Self {
        Self {
            number: page.number,
            total_pages: page.total_pages,
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            next_number: page.next_number(),
            previous_number: page.previous_number(),
        }
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

fn group_labels(groups: &[Group]) -> HashMap<Uuid, (String, String)> {
    groups
        .iter()
        .map(|g| (g.id, (g.title.clone(), g.slug.clone())))
        .collect()
}

/// Resolve author names (and group labels where tagged) for a page of posts.
pub async fn post_views(state: &AppState, posts: &[Post]) -> AppResult<Vec<PostView>> {
    let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<Uuid, String> = state
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    let groups = if posts.iter().any(|p| p.group_id.is_some()) {
        group_labels(&state.groups.list().await?)
    } else {
        HashMap::new()
    };

    Ok(posts
        .iter()
        .map(|post| {
            let group = post.group_id.and_then(|id| groups.get(&id));
            PostView {
                id: post.id,
                text: post.text.clone(),
                author: authors
                    .get(&post.author_id)
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                group_title: group.map(|(title, _)| title.clone()),
                group_slug: group.map(|(_, slug)| slug.clone()),
                image_url: post.image_url.clone(),
                created_at: format_timestamp(&post.created_at),
            }
        })
        .collect())
}

/// Resolve author names for the comments under a post.
pub async fn comment_views(state: &AppState, comments: &[Comment]) -> AppResult<Vec<CommentView>> {
    let mut author_ids: Vec<Uuid> = comments.iter().map(|c| c.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<Uuid, String> = state
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    Ok(comments
        .iter()
        .map(|comment| CommentView {
            author: authors
                .get(&comment.author_id)
                .cloned()
                .unwrap_or_else(|| "unknown".to_string()),
            text: comment.text.clone(),
            created_at: format_timestamp(&comment.created_at),
        })
        .collect())
}

/// Render a template into a 200 HTML response.
pub fn render<T: Template>(template: &T) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(template.render()?))
}

/// 302 to a same-site location.
pub fn redirect_to(location: impl Into<String>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}
