//! Application state - shared across all handlers.

use std::sync::Arc;

use sea_orm::{DbConn, DbErr};

use quill_core::ports::{
    CommentRepository, FollowRepository, GroupRepository, PasswordService, PostRepository,
    SessionTokenService, UserRepository,
};
use quill_infra::auth::{Argon2PasswordService, JwtSessionService};
use quill_infra::database::{
    self, PostgresCommentRepository, PostgresFollowRepository, PostgresGroupRepository,
    PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub sessions: Arc<dyn SessionTokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub posts_per_page: u64,
}

impl AppState {
    /// Build the application state: connect the pool and wire the adapters.
    pub async fn new(config: &AppConfig) -> Result<Self, DbErr> {
        let db = database::connect(&config.database).await?;

        let state = Self::from_parts(
            db,
            Arc::new(JwtSessionService::from_env()),
            Arc::new(Argon2PasswordService::new()),
            config.posts_per_page,
        );

        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// Wire repositories over an existing connection. Tests hand in a mock
    /// connection and fixed services here.
    pub fn from_parts(
        db: DbConn,
        sessions: Arc<dyn SessionTokenService>,
        passwords: Arc<dyn PasswordService>,
        posts_per_page: u64,
    ) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            groups: Arc::new(PostgresGroupRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            follows: Arc::new(PostgresFollowRepository::new(db)),
            sessions,
            passwords,
            posts_per_page,
        }
    }
}
