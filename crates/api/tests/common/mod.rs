#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use yamdb_api::auth::jwt::{generate_access_token, JwtConfig};
use yamdb_api::config::ServerConfig;
use yamdb_api::router::{build_app, App};
use yamdb_api::state::AppState;
use yamdb_core::roles::Role;
use yamdb_core::types::DbId;
use yamdb_db::models::taxon::{CreateTaxon, Taxon, TaxonKind};
use yamdb_db::models::title::{CreateTitle, Title};
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::{TaxonRepo, TitleRepo, UserRepo};
use yamdb_mail::{EmailConfig, MailBackend, MailError, Mailer};

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_days: 100,
        },
        confirmation_code_ttl_mins: 24 * 60,
        email: EmailConfig {
            backend: MailBackend::File,
            from_address: "noreply@yamdb.local".to_string(),
            file_path: std::env::temp_dir().join("yamdb-test-mail"),
            smtp: None,
        },
    }
}

/// One confirmation code captured by [`RecordingMailer`].
#[derive(Debug, Clone)]
pub struct SentCode {
    pub email: String,
    pub username: String,
    pub code: String,
}

/// Mailer that keeps every code in memory instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentCode>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentCode> {
        self.sent.lock().unwrap().clone()
    }

    /// The most recent code mailed to `username`.
    pub fn last_code_for(&self, username: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.username == username)
            .map(|s| s.code.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_confirmation_code(
        &self,
        to_email: &str,
        username: &str,
        code: &str,
    ) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(SentCode {
            email: to_email.to_string(),
            username: username.to_string(),
            code: code.to_string(),
        });
        Ok(())
    }
}

/// Build the full application with all middleware layers, using the given
/// database pool. Sent mail is discarded.
pub fn build_test_app(pool: PgPool) -> App {
    build_test_app_with_mailer(pool, Arc::new(RecordingMailer::default()))
}

/// Like [`build_test_app`], but codes land in `mailer` for inspection.
pub fn build_test_app_with_mailer(pool: PgPool, mailer: Arc<RecordingMailer>) -> App {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer,
    };
    build_app(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly and return it.
pub async fn create_user(pool: &PgPool, username: &str, role: Role) -> User {
    let input = CreateUser {
        role,
        ..CreateUser::signup(username, format!("{username}@test.com"))
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// A valid access token for `user`.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Insert a user and mint a token for it.
pub async fn user_with_token(pool: &PgPool, username: &str, role: Role) -> (User, String) {
    let user = create_user(pool, username, role).await;
    let token = token_for(&user);
    (user, token)
}

pub async fn create_category(pool: &PgPool, name: &str, slug: &str) -> Taxon {
    create_taxon(pool, TaxonKind::Category, name, slug).await
}

pub async fn create_genre(pool: &PgPool, name: &str, slug: &str) -> Taxon {
    create_taxon(pool, TaxonKind::Genre, name, slug).await
}

async fn create_taxon(pool: &PgPool, kind: TaxonKind, name: &str, slug: &str) -> Taxon {
    let input = CreateTaxon {
        name: name.to_string(),
        slug: slug.to_string(),
    };
    TaxonRepo::create(pool, kind, &input)
        .await
        .expect("taxon creation should succeed")
}

pub async fn create_title(
    pool: &PgPool,
    name: &str,
    year: i32,
    category_id: DbId,
    genre_ids: Vec<DbId>,
) -> Title {
    let input = CreateTitle {
        name: name.to_string(),
        year,
        description: None,
        category_id,
        genre_ids,
    };
    TitleRepo::create(pool, &input)
        .await
        .expect("title creation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: App, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: Method,
    uri: &str,
    body: &serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: App, uri: &str) -> Response {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: App, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn post_json(app: App, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, &body, None)).await
}

pub async fn post_json_auth(app: App, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request(Method::POST, uri, &body, Some(token))).await
}

pub async fn patch_json_auth(
    app: App,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::PATCH, uri, &body, Some(token))).await
}

pub async fn delete(app: App, uri: &str) -> Response {
    send(app, empty_request(Method::DELETE, uri, None)).await
}

pub async fn delete_auth(app: App, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
