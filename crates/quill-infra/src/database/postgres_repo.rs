//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
};
use uuid::Uuid;

use quill_core::domain::{Comment, Follow, Post, User};
use quill_core::error::RepoError;
use quill_core::pagination::{self, Page, PageRequest};
use quill_core::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<quill_core::domain::Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<quill_core::domain::Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Title)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Count, clamp the requested page into range, then fetch one window of an
/// already-ordered post query.
async fn fetch_post_page(
    db: &DbConn,
    select: Select<PostEntity>,
    request: PageRequest,
) -> Result<Page<Post>, RepoError> {
    let paginator = select
        .order_by_desc(post::Column::CreatedAt)
        .paginate(db, request.per_page());

    let total_items = paginator.num_items().await.map_err(map_db_err)?;
    let request = request.clamp_to(pagination::total_pages(total_items, request.per_page()));

    let models = paginator
        .fetch_page(request.number() - 1)
        .await
        .map_err(map_db_err)?;

    Ok(Page::new(
        models.into_iter().map(Into::into).collect(),
        request,
        total_items,
    ))
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn page_recent(&self, request: PageRequest) -> Result<Page<Post>, RepoError> {
        fetch_post_page(&self.db, PostEntity::find(), request).await
    }

    async fn page_by_group(
        &self,
        group_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let select = PostEntity::find().filter(post::Column::GroupId.eq(group_id));
        fetch_post_page(&self.db, select, request).await
    }

    async fn page_by_author(
        &self,
        author_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let select = PostEntity::find().filter(post::Column::AuthorId.eq(author_id));
        fetch_post_page(&self.db, select, request).await
    }

    async fn page_by_authors(
        &self,
        author_ids: &[Uuid],
        request: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        if author_ids.is_empty() {
            return Ok(Page::new(vec![], request.clamp_to(1), 0));
        }

        let select =
            PostEntity::find().filter(post::Column::AuthorId.is_in(author_ids.iter().copied()));
        fetch_post_page(&self.db, select, request).await
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL follow repository.
///
/// Mutations are idempotent at the statement level: the insert rides on the
/// unique `(user_id, author_id)` index with DO NOTHING, the delete tolerates
/// zero affected rows.
pub struct PostgresFollowRepository {
    db: DbConn,
}

impl PostgresFollowRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let active_model: follow::ActiveModel = Follow::new(user_id, author_id).into();

        let inserted = FollowEntity::insert(active_model)
            .on_conflict(
                OnConflict::columns([follow::Column::UserId, follow::Column::AuthorId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(inserted > 0)
    }

    async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let result = FollowEntity::delete_many()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        Ok(self.find(user_id, author_id).await?.is_some())
    }

    async fn followed_author_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let rows = FollowEntity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(|row| row.author_id).collect())
    }

    async fn find(&self, user_id: Uuid, author_id: Uuid) -> Result<Option<Follow>, RepoError> {
        let result = FollowEntity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}
