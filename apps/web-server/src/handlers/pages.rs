//! Read-only pages: the feeds, group and profile listings, post detail.

use actix_web::{HttpResponse, web};
use askama::Template;
use uuid::Uuid;

use crate::middleware::auth::MaybeUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{self, CommentView, PageMeta, PostView};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    current_user: Option<String>,
    posts: Vec<PostView>,
    page: PageMeta,
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    viewer: MaybeUser,
    query: web::Query<super::PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .page_recent(query.request(state.posts_per_page))
        .await?;
    let posts = views::post_views(&state, &page.items).await?;

    views::render(&IndexTemplate {
        current_user: viewer.username(),
        posts,
        page: PageMeta::of(&page),
    })
}

#[derive(Template)]
#[template(path = "group_list.html")]
struct GroupTemplate {
    current_user: Option<String>,
    group_title: String,
    group_description: String,
    posts: Vec<PostView>,
    page: PageMeta,
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    viewer: MaybeUser,
    slug: web::Path<String>,
    query: web::Query<super::PageQuery>,
) -> AppResult<HttpResponse> {
    let group = state
        .groups
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("group `{slug}`")))?;

    let page = state
        .posts
        .page_by_group(group.id, query.request(state.posts_per_page))
        .await?;
    let posts = views::post_views(&state, &page.items).await?;

    views::render(&GroupTemplate {
        current_user: viewer.username(),
        group_title: group.title,
        group_description: group.description,
        posts,
        page: PageMeta::of(&page),
    })
}

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfileTemplate {
    current_user: Option<String>,
    author: String,
    posts_count: u64,
    following: bool,
    is_self: bool,
    posts: Vec<PostView>,
    page: PageMeta,
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    viewer: MaybeUser,
    username: web::Path<String>,
    query: web::Query<super::PageQuery>,
) -> AppResult<HttpResponse> {
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user `{username}`")))?;

    let page = state
        .posts
        .page_by_author(author.id, query.request(state.posts_per_page))
        .await?;
    let posts_count = state.posts.count_by_author(author.id).await?;
    let posts = views::post_views(&state, &page.items).await?;

    let is_self = viewer
        .0
        .as_ref()
        .is_some_and(|viewer| viewer.id == author.id);
    let following = match &viewer.0 {
        Some(viewer) if !is_self => state.follows.is_following(viewer.id, author.id).await?,
        _ => false,
    };

    views::render(&ProfileTemplate {
        current_user: viewer.username(),
        author: author.username,
        posts_count,
        following,
        is_self,
        posts,
        page: PageMeta::of(&page),
    })
}

#[derive(Template)]
#[template(path = "post_detail.html")]
struct PostDetailTemplate {
    current_user: Option<String>,
    post: PostView,
    posts_count: u64,
    comments: Vec<CommentView>,
}

/// GET /posts/{id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    viewer: MaybeUser,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(*id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post `{id}`")))?;

    let posts_count = state.posts.count_by_author(post.author_id).await?;
    let comments = state.comments.list_for_post(post.id).await?;
    let comments = views::comment_views(&state, &comments).await?;

    let mut post_views = views::post_views(&state, std::slice::from_ref(&post)).await?;
    let post = post_views
        .pop()
        .ok_or_else(|| AppError::Internal("post view resolution came back empty".into()))?;

    views::render(&PostDetailTemplate {
        current_user: viewer.username(),
        post,
        posts_count,
        comments,
    })
}
