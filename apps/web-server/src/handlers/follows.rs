//! Follow subscriptions and the followed-authors feed.

use actix_web::{HttpResponse, web};
use askama::Template;

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{self, PageMeta, PostView};

#[derive(Template)]
#[template(path = "follow.html")]
struct FollowTemplate {
    current_user: Option<String>,
    posts: Vec<PostView>,
    page: PageMeta,
}

/// GET /follow/ - posts authored by anyone the requesting user follows,
/// newest first.
pub async fn follow_index(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<super::PageQuery>,
) -> AppResult<HttpResponse> {
    let author_ids = state.follows.followed_author_ids(user.id).await?;
    let page = state
        .posts
        .page_by_authors(&author_ids, query.request(state.posts_per_page))
        .await?;
    let posts = views::post_views(&state, &page.items).await?;

    views::render(&FollowTemplate {
        current_user: Some(user.username),
        posts,
        page: PageMeta::of(&page),
    })
}

/// GET /profile/{username}/follow
///
/// Idempotent: a duplicate follow and a self-follow are both no-ops.
pub async fn profile_follow(
    state: web::Data<AppState>,
    user: CurrentUser,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user `{username}`")))?;

    if author.id != user.id {
        let created = state.follows.follow(user.id, author.id).await?;
        if created {
            tracing::info!(follower = %user.username, author = %author.username, "Followed");
        }
    }

    Ok(views::redirect_to(format!("/profile/{username}/")))
}

/// GET /profile/{username}/unfollow
///
/// Idempotent: unfollowing someone you don't follow is a no-op. Lands back
/// on the author's profile.
pub async fn profile_unfollow(
    state: web::Data<AppState>,
    user: CurrentUser,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user `{username}`")))?;

    let removed = state.follows.unfollow(user.id, author.id).await?;
    if removed {
        tracing::info!(follower = %user.username, author = %author.username, "Unfollowed");
    }

    Ok(views::redirect_to(format!("/profile/{username}/")))
}
