#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use uuid::Uuid;

    use quill_core::domain::Post;
    use quill_core::error::RepoError;
    use quill_core::pagination::PageRequest;
    use quill_core::ports::{BaseRepository, FollowRepository, PostRepository, UserRepository};

    use crate::database::entity::{post, user};
    use crate::database::postgres_repo::{
        PostgresFollowRepository, PostgresPostRepository, PostgresUserRepository,
    };

    fn post_model(author_id: Uuid, text: &str) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id: Uuid::new_v4(),
            author_id,
            group_id: None,
            text: text.to_owned(),
            image_url: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
    }

    #[tokio::test]
    async fn find_post_by_id() {
        let model = post_model(Uuid::new_v4(), "Test Post");
        let post_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let found = result.unwrap();
        assert_eq!(found.text, "Test Post");
        assert_eq!(found.id, post_id);
    }

    #[tokio::test]
    async fn insert_post_returns_stored_row() {
        let author_id = Uuid::new_v4();
        let model = post_model(author_id, "hello");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let stored = repo.insert(Post::from(model)).await.unwrap();

        assert_eq!(stored.text, "hello");
        assert_eq!(stored.author_id, author_id);
    }

    #[tokio::test]
    async fn find_user_by_username() {
        let now = chrono::Utc::now();
        let model = user::Model {
            id: Uuid::new_v4(),
            username: "leo".to_owned(),
            email: "leo@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            created_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let user = repo.find_by_username("leo").await.unwrap().unwrap();
        assert_eq!(user.username, "leo");
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo: Box<dyn PostRepository> = Box::new(PostgresPostRepository::new(db));

        let result = repo.delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn follow_twice_inserts_once() {
        // The second insert hits the unique (user_id, author_id) index and
        // DO NOTHING reports zero affected rows.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = PostgresFollowRepository::new(db);
        let (user_id, author_id) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(repo.follow(user_id, author_id).await.unwrap());
        assert!(!repo.follow(user_id, author_id).await.unwrap());
    }

    #[tokio::test]
    async fn unfollow_when_not_following_is_noop() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresFollowRepository::new(db);

        let removed = repo
            .unfollow(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();
        assert!(!removed);
    }

    #[tokio::test]
    async fn page_by_author_clamps_out_of_range_pages() {
        let author_id = Uuid::new_v4();

        // 12 posts at 10 per page -> 2 pages; the store serves the count,
        // then the window for the clamped page.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(12)]])
            .append_query_results(vec![vec![
                post_model(author_id, "eleventh"),
                post_model(author_id, "twelfth"),
            ]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let page = repo
            .page_by_author(author_id, PageRequest::new(99, 10))
            .await
            .unwrap();

        assert_eq!(page.number, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 2);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn feed_with_no_followed_authors_is_empty_without_querying() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PostgresPostRepository::new(db);

        let page = repo
            .page_by_authors(&[], PageRequest::new(1, 10))
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 1);
    }
}
