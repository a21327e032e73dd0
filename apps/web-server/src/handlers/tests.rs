use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{App, test, web};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
use uuid::Uuid;

use quill_core::ports::{PasswordService, SessionTokenService};
use quill_infra::auth::{Argon2PasswordService, JwtSessionService, SessionConfig};
use quill_infra::database::entity::{comment, group, post, user};

use crate::handlers::configure_routes;
use crate::middleware::auth::SESSION_COOKIE;
use crate::state::AppState;

fn session_service() -> Arc<JwtSessionService> {
    Arc::new(JwtSessionService::new(SessionConfig {
        secret: "test-secret-key".to_string(),
        ttl_hours: 1,
        issuer: "test-issuer".to_string(),
    }))
}

fn test_state(db: DatabaseConnection) -> (AppState, Arc<JwtSessionService>) {
    let sessions = session_service();
    let state = AppState::from_parts(
        db,
        sessions.clone(),
        Arc::new(Argon2PasswordService::new()),
        10,
    );
    (state, sessions)
}

fn auth_cookie(sessions: &JwtSessionService, id: Uuid, username: &str) -> Cookie<'static> {
    Cookie::new(SESSION_COOKIE, sessions.issue(id, username).unwrap())
}

fn user_model(id: Uuid, username: &str, password_hash: &str) -> user::Model {
    user::Model {
        id,
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password_hash: password_hash.to_owned(),
        created_at: chrono::Utc::now().into(),
    }
}

fn post_model(author_id: Uuid, group_id: Option<Uuid>, text: &str) -> post::Model {
    let now = chrono::Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        author_id,
        group_id,
        text: text.to_owned(),
        image_url: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, Value> {
    std::collections::BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

fn location(resp: &actix_web::dev::ServiceResponse) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn unauthenticated_create_redirects_to_login_with_next() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let (state, _) = test_state(db);
    let app = app!(state);

    let req = test::TestRequest::get().uri("/create/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/auth/login/?next=/create/");
}

#[actix_web::test]
async fn unauthenticated_comment_redirects_to_login() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let (state, _) = test_state(db);
    let app = app!(state);

    let post_id = Uuid::new_v4();
    let req = test::TestRequest::post()
        .uri(&format!("/posts/{post_id}/comment"))
        .set_form([("text", "hi")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(
        location(&resp),
        format!("/auth/login/?next=/posts/{post_id}/comment")
    );
}

#[actix_web::test]
async fn unknown_post_detail_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();
    let (state, _) = test_state(db);
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn non_author_edit_redirects_to_detail() {
    let author_id = Uuid::new_v4();
    let model = post_model(author_id, None, "not yours");
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();
    let (state, sessions) = test_state(db);
    let app = app!(state);

    let intruder = Uuid::new_v4();
    let req = test::TestRequest::get()
        .uri(&format!("/posts/{post_id}/edit/"))
        .cookie(auth_cookie(&sessions, intruder, "intruder"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), format!("/posts/{post_id}/"));
}

#[actix_web::test]
async fn author_sees_prefilled_edit_form() {
    let author_id = Uuid::new_v4();
    let model = post_model(author_id, None, "original text");
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .append_query_results(vec![Vec::<group::Model>::new()])
        .into_connection();
    let (state, sessions) = test_state(db);
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{post_id}/edit/"))
        .cookie(auth_cookie(&sessions, author_id, "leo"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("original text"));
}

#[actix_web::test]
async fn create_post_redirects_to_the_author_profile() {
    let author_id = Uuid::new_v4();
    let stored = post_model(author_id, None, "fresh post");

    // The insert is served back as the stored row.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![stored]])
        .into_connection();
    let (state, sessions) = test_state(db);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(auth_cookie(&sessions, author_id, "leo"))
        .set_form([("text", "fresh post"), ("group", ""), ("image_url", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/profile/leo/");
}

#[actix_web::test]
async fn author_edit_saves_and_redirects_to_detail() {
    let author_id = Uuid::new_v4();
    let original = post_model(author_id, None, "before");
    let post_id = original.id;
    let mut updated = original.clone();
    updated.text = "after".to_owned();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![original]])
        .append_query_results(vec![vec![updated]])
        .into_connection();
    let (state, sessions) = test_state(db);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{post_id}/edit/"))
        .cookie(auth_cookie(&sessions, author_id, "leo"))
        .set_form([("text", "after"), ("group", ""), ("image_url", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), format!("/posts/{post_id}/"));
}

#[actix_web::test]
async fn post_detail_shows_text_and_author() {
    let author = user_model(Uuid::new_v4(), "leo", "hash");
    let model = post_model(author.id, None, "hello world");
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .append_query_results(vec![vec![count_row(1)]])
        .append_query_results(vec![Vec::<comment::Model>::new()])
        .append_query_results(vec![vec![author]])
        .into_connection();
    let (state, _) = test_state(db);
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{post_id}/"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("hello world"));
    assert!(body.contains("leo"));
}

#[actix_web::test]
async fn index_lists_a_post_once() {
    let author = user_model(Uuid::new_v4(), "leo", "hash");
    let model = post_model(author.id, None, "a feed entry");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![count_row(1)]])
        .append_query_results(vec![vec![model]])
        .append_query_results(vec![vec![author]])
        .into_connection();
    let (state, _) = test_state(db);
    let app = app!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert_eq!(body.matches("a feed entry").count(), 1);
}

#[actix_web::test]
async fn group_page_lists_a_tagged_post_once() {
    let author = user_model(Uuid::new_v4(), "leo", "hash");
    let group_model = group::Model {
        id: Uuid::new_v4(),
        title: "Test".to_owned(),
        slug: "t1".to_owned(),
        description: String::new(),
        created_at: chrono::Utc::now().into(),
    };
    let model = post_model(author.id, Some(group_model.id), "hello from t1");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![group_model.clone()]])
        .append_query_results(vec![vec![count_row(1)]])
        .append_query_results(vec![vec![model]])
        .append_query_results(vec![vec![author]])
        .append_query_results(vec![vec![group_model]])
        .into_connection();
    let (state, _) = test_state(db);
    let app = app!(state);

    let req = test::TestRequest::get().uri("/group/t1/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert_eq!(body.matches("hello from t1").count(), 1);
    assert!(body.contains("Test"));
}

#[actix_web::test]
async fn profile_page_lists_the_author_post_once() {
    let author = user_model(Uuid::new_v4(), "leo", "hash");
    let group_model = group::Model {
        id: Uuid::new_v4(),
        title: "Test".to_owned(),
        slug: "t1".to_owned(),
        description: String::new(),
        created_at: chrono::Utc::now().into(),
    };
    let model = post_model(author.id, Some(group_model.id), "hello from t1");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![author.clone()]])
        .append_query_results(vec![vec![count_row(1)]])
        .append_query_results(vec![vec![model]])
        .append_query_results(vec![vec![count_row(1)]])
        .append_query_results(vec![vec![author]])
        .append_query_results(vec![vec![group_model]])
        .into_connection();
    let (state, _) = test_state(db);
    let app = app!(state);

    let req = test::TestRequest::get().uri("/profile/leo/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert_eq!(body.matches("hello from t1").count(), 1);
}

#[actix_web::test]
async fn following_yourself_is_a_noop() {
    let me = user_model(Uuid::new_v4(), "leo", "hash");
    let my_id = me.id;

    // Only the username lookup is served; an attempted insert would trip the
    // mock's empty exec queue.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![me]])
        .into_connection();
    let (state, sessions) = test_state(db);
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/profile/leo/follow")
        .cookie(auth_cookie(&sessions, my_id, "leo"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/profile/leo/");
}

#[actix_web::test]
async fn login_sets_session_cookie_and_honors_next() {
    let passwords = Argon2PasswordService::new();
    let hash = passwords.hash("password123").unwrap();
    let me = user_model(Uuid::new_v4(), "leo", &hash);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![me]])
        .into_connection();
    let (state, _) = test_state(db);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([
            ("username", "leo"),
            ("password", "password123"),
            ("next", "/create/"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/create/");
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(set_cookie.starts_with(SESSION_COOKIE));
}

#[actix_web::test]
async fn login_with_wrong_password_rerenders_the_form() {
    let passwords = Argon2PasswordService::new();
    let hash = passwords.hash("password123").unwrap();
    let me = user_model(Uuid::new_v4(), "leo", &hash);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![me]])
        .into_connection();
    let (state, _) = test_state(db);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([("username", "leo"), ("password", "nope"), ("next", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Invalid username or password"));
}

#[actix_web::test]
async fn signup_validation_failure_rerenders_with_messages() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let (state, _) = test_state(db);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "new user"),
            ("email", "not-an-email"),
            ("password", "short"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Password must be at least 8 characters"));
    assert!(body.contains("Invalid email address"));
}
