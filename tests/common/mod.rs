#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use lousa::lousa_config::{
    CorsConfig, EmailConfig, JwtConfig, PasswordResetConfig, RateLimitConfig,
};
use lousa::lousa_core::hash_password;
use lousa::router::init_router;
use lousa::state::AppState;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-at-least-32-characters-long".to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 604800,
    }
}

pub fn test_email_config() -> EmailConfig {
    EmailConfig {
        enabled: false,
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_email: "noreply@lousa.app".to_string(),
        from_name: "Lousa".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        email_config: test_email_config(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        rate_limit_config: RateLimitConfig::disabled(),
        password_reset_config: PasswordResetConfig::default(),
    }
}

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    init_router(test_state(pool))
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Inserts an active user directly, bypassing the registration endpoint.
pub async fn create_test_user(pool: &PgPool, email: &str, password: &str) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO users (name, email, phone, password)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind("Test User")
    .bind(email)
    .bind("11912345678")
    .bind(hashed)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        name: "Test User".to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn authed_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn count_reset_tokens(pool: &PgPool, user_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM password_reset_tokens WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
