mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    TestUser, authed_request, body_json, create_test_user, generate_unique_email, json_request,
    setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn login(app: &axum::Router, user: &TestUser) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": user.email, "password": user.password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access"]
        .as_str()
        .unwrap()
        .to_string()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_returns_current_user(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_email(), "secret1").await;
    let app = setup_test_app(pool);
    let token = login(&app, &user).await;

    let response = app
        .oneshot(authed_request("GET", "/api/me", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], user.id.to_string());
    assert_eq!(body["email"], user.email);
    assert_eq!(body["name"], user.name);
    assert!(body.get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_without_token(pool: PgPool) {
    let app = setup_test_app(pool);

    let request = Request::builder()
        .method("GET")
        .uri("/api/me")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_with_garbage_token(pool: PgPool) {
    let app = setup_test_app(pool);

    let response = app
        .oneshot(authed_request("GET", "/api/me", "not-a-jwt", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_for_deactivated_user(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_email(), "secret1").await;
    let app = setup_test_app(pool.clone());
    let token = login(&app, &user).await;

    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let response = app
        .oneshot(authed_request("GET", "/api/me", &token, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_profile(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_email(), "secret1").await;
    let app = setup_test_app(pool);
    let token = login(&app, &user).await;

    let response = app
        .oneshot(authed_request(
            "PATCH",
            "/api/me",
            &token,
            Some(json!({
                "name": "  Ana Maria ",
                "email": " Ana.Maria@X.com",
                "phone": "(21) 3333-4444"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Ana Maria");
    assert_eq!(body["email"], "ana.maria@x.com");
    assert_eq!(body["phone"], "2133334444");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_profile_keeps_own_email(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_email(), "secret1").await;
    let app = setup_test_app(pool);
    let token = login(&app, &user).await;

    let response = app
        .oneshot(authed_request(
            "PATCH",
            "/api/me",
            &token,
            Some(json!({ "email": user.email.to_uppercase() })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["email"], user.email);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_profile_email_taken(pool: PgPool) {
    let other = create_test_user(&pool, &generate_unique_email(), "secret1").await;
    let user = create_test_user(&pool, &generate_unique_email(), "secret1").await;
    let app = setup_test_app(pool);
    let token = login(&app, &user).await;

    let response = app
        .oneshot(authed_request(
            "PATCH",
            "/api/me",
            &token,
            Some(json!({ "email": other.email })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["errors"]["email"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_profile_invalid_phone(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_email(), "secret1").await;
    let app = setup_test_app(pool);
    let token = login(&app, &user).await;

    let response = app
        .oneshot(authed_request(
            "PATCH",
            "/api/me",
            &token,
            Some(json!({ "phone": "1234" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["errors"]["phone"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_profile_blank_name(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_email(), "secret1").await;
    let app = setup_test_app(pool.clone());
    let token = login(&app, &user).await;

    let response = app
        .oneshot(authed_request(
            "PATCH",
            "/api/me",
            &token,
            Some(json!({ "name": "   " })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["errors"]["name"].is_array());

    let stored: String = sqlx::query_scalar("SELECT name FROM users WHERE id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, user.name);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_profile_password(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_email(), "secret1").await;
    let app = setup_test_app(pool);
    let token = login(&app, &user).await;

    let response = app
        .clone()
        .oneshot(authed_request(
            "PATCH",
            "/api/me",
            &token,
            Some(json!({ "password": "changed1" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": user.email, "password": "secret1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": user.email, "password": "changed1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
