//! Common test utilities for integration tests.
//!
//! Integration tests run against a real PostgreSQL database named by
//! `TEST_DATABASE_URL`. When the variable is unset every test returns early.
//!
//! Tests share one database and run in parallel, so each test seeds its own
//! profiles under fresh ids and deletes only those when it finishes.

// Helpers are shared across test binaries; not every binary uses all of them.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use fake::faker::address::en::CityName;
use fake::faker::name::en::Name;
use fake::Fake;
use maknoon_api::{
    app::create_app,
    config::{
        AdminConfig, Config, DatabaseConfig, JwtAuthConfig, LimitsConfig, LoggingConfig,
        SecurityConfig, ServerConfig, StorageConfig,
    },
};
use shared::jwt::JwtConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Connects to the test database, or `None` when `TEST_DATABASE_URL` is unset.
pub async fn create_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    Some(pool)
}

/// Run migrations on the test database.
pub async fn run_migrations(pool: &PgPool) {
    let migration_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("persistence/src/migrations");

    let mut entries: Vec<_> = std::fs::read_dir(&migration_dir)
        .expect("Failed to read migrations directory")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|ext| ext == "sql").unwrap_or(false))
        .collect();

    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let sql = std::fs::read_to_string(entry.path()).expect("Failed to read migration file");

        // Every migration is idempotent; a concurrent run may still race.
        sqlx::raw_sql(&sql).execute(pool).await.ok();
    }
}

/// Pool plus migrations, the preamble of every test.
pub async fn setup() -> Option<PgPool> {
    let pool = create_test_pool().await?;
    run_migrations(&pool).await;
    Some(pool)
}

/// HS256 test configuration with rate limiting disabled.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
            max_body_size: 1_048_576,
        },
        database: DatabaseConfig {
            url: std::env::var("TEST_DATABASE_URL").unwrap_or_default(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            rate_limit_per_minute: 0,
        },
        limits: LimitsConfig {
            message_page_size: 50,
            max_bio_length: 1000,
            allow_rerequest_after_decline: false,
        },
        jwt: JwtAuthConfig {
            algorithm: "HS256".to_string(),
            secret: TEST_JWT_SECRET.to_string(),
            public_key: String::new(),
            private_key: None,
            audience: None,
            access_token_expiry_secs: 3600,
            leeway_secs: 30,
        },
        storage: StorageConfig::default(),
        admin: AdminConfig::default(),
    }
}

/// Create a test application router.
pub fn create_test_app(config: Config, pool: PgPool) -> Router {
    create_app(config, pool).expect("Failed to build test app")
}

/// An identity with a token signed the way the identity provider would.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub token: String,
}

impl TestUser {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        let name: String = Name().fake();
        let (token, _) = JwtConfig::from_secret(TEST_JWT_SECRET)
            .expect("test signing key")
            .generate_access_token(id, Some(&name))
            .expect("test token");
        Self { id, name, token }
    }
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new()
    }
}

/// Inserts a fully filled profile row for `user` with the given status and
/// role, bypassing the review flow.
pub async fn seed_profile(pool: &PgPool, user: &TestUser, status: &str, role: &str) {
    let location: String = CityName().fake();
    sqlx::query(
        r#"
        INSERT INTO user_profile
            (id, name, bio, date_of_birth, gender, location,
             profile_status, role, submitted_at)
        VALUES ($1, $2, $3, DATE '1995-04-12', 'female', $4,
                $5::profile_status, $6::user_role, NOW())
        "#,
    )
    .bind(user.id)
    .bind(&user.name)
    .bind("Seeded for integration tests")
    .bind(location)
    .bind(status)
    .bind(role)
    .execute(pool)
    .await
    .expect("Failed to seed profile");
}

/// Seeds an approved regular user.
pub async fn approved_user(pool: &PgPool) -> TestUser {
    let user = TestUser::new();
    seed_profile(pool, &user, "approved", "user").await;
    user
}

/// Seeds an approved admin.
pub async fn admin_user(pool: &PgPool) -> TestUser {
    let user = TestUser::new();
    seed_profile(pool, &user, "approved", "admin").await;
    user
}

/// Deletes the given profiles and everything hanging off them.
pub async fn cleanup_users(pool: &PgPool, users: &[&TestUser]) {
    let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();

    // Rooms without a connection (admin test chats) are not cascaded.
    sqlx::query(
        r#"
        DELETE FROM chat_room
        WHERE connection_id IS NULL
          AND id IN (SELECT chat_room_id FROM chat_room_member WHERE member_id = ANY($1))
        "#,
    )
    .bind(&ids)
    .execute(pool)
    .await
    .ok();

    sqlx::query("DELETE FROM user_profile WHERE id = ANY($1)")
        .bind(&ids)
        .execute(pool)
        .await
        .expect("Failed to clean up profiles");
}

pub fn get_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn delete_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn json_request_with_auth(
    method: Method,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Parse response body as JSON.
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

/// `Location` header of a redirect response.
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
