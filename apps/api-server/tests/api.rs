//! End-to-end API tests - the full router against the in-memory store.

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::json;

use api_server::handlers;
use api_server::state::AppState;
use quill_core::ports::{PasswordService, TokenService};
use quill_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key".to_string(),
        expiration_hours: 1,
        issuer: "quill-api".to_string(),
    }
}

macro_rules! test_app {
    () => {{
        let state = AppState::in_memory();
        let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(jwt_config()));
        let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(token_service))
                .app_data(web::Data::new(password_service))
                .configure(handlers::configure_routes),
        )
        .await
    }};
}

/// Register a user and log them in, returning the bearer token.
macro_rules! signup {
    ($app:expr, $username:expr, $password:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"username": $username, "password": $password}))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": $username, "password": $password}))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        body["data"]["access_token"].as_str().unwrap().to_string()
    }};
}

macro_rules! create_post {
    ($app:expr, $token:expr, $title:expr, $content:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .set_json(json!({"title": $title, "content": $content}))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        body["data"]["id"].as_str().unwrap().to_string()
    }};
}

#[actix_web::test]
async fn registering_same_username_twice_conflicts() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"username": "alice", "password": "secret1"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"username": "alice", "password": "different1"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );
}

#[actix_web::test]
async fn register_reports_all_failing_constraints() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"username": "", "password": "abc"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("Username is required"));
    assert!(detail.contains("Password must be at least 6 characters"));
}

#[actix_web::test]
async fn register_does_not_leak_password_hash() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"username": "alice", "password": "secret1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["username"], "alice");
    assert!(body["data"].get("password_hash").is_none());
}

#[actix_web::test]
async fn login_failures_are_indistinguishable() {
    let app = test_app!();
    signup!(&app, "alice", "secret1");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "alice", "password": "wrong-password"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: serde_json::Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "nobody", "password": "secret1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: serde_json::Value = test::read_body_json(resp).await;

    assert_eq!(wrong_password, unknown_user);
}

#[actix_web::test]
async fn login_token_decodes_to_the_right_user() {
    let app = test_app!();
    let token = signup!(&app, "alice", "secret1");

    let claims = JwtTokenService::new(jwt_config())
        .validate_token(&token)
        .unwrap();
    assert_eq!(claims.username, "alice");

    // The id embedded in the token is the author id recorded on posts.
    create_post!(&app, token, "T", "C");
    let req = test::TestRequest::get()
        .uri("/api/blogs")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["data"][0]["author_id"].as_str().unwrap(),
        claims.user_id.to_string()
    );
    assert_eq!(body["data"][0]["author"], "alice");
}

#[actix_web::test]
async fn protected_routes_reject_missing_and_bad_tokens() {
    let app = test_app!();

    // No token
    let req = test::TestRequest::get().uri("/api/blogs").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    // Tampered token
    let token = signup!(&app, "alice", "secret1");
    let tampered = format!("{}x", token);
    let req = test::TestRequest::get()
        .uri("/api/blogs")
        .insert_header(("Authorization", format!("Bearer {}", tampered)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    // Raw token without the Bearer prefix
    let req = test::TestRequest::get()
        .uri("/api/blogs")
        .insert_header(("Authorization", token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    // Expired token
    let expired = JwtTokenService::new(JwtConfig {
        expiration_hours: -1,
        ..jwt_config()
    })
    .generate_token(uuid::Uuid::new_v4(), "alice")
    .unwrap();
    let req = test::TestRequest::get()
        .uri("/api/blogs")
        .insert_header(("Authorization", format!("Bearer {}", expired)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn post_update_applies_only_present_fields() {
    let app = test_app!();
    let token = signup!(&app, "alice", "secret1");
    let post_id = create_post!(&app, token, "Original title", "Original content");

    // Only the title changes
    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/{}", post_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"title": "X"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "X");
    assert_eq!(body["data"]["content"], "Original content");

    // Empty body changes nothing
    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/{}", post_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "X");
    assert_eq!(body["data"]["content"], "Original content");

    // An explicit empty string IS an update
    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/{}", post_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"content": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["content"], "");
}

#[actix_web::test]
async fn deleting_a_post_twice_is_not_found() {
    let app = test_app!();
    let token = signup!(&app, "alice", "secret1");
    let post_id = create_post!(&app, token, "T", "C");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blogs/{}", post_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blogs/{}", post_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn commenting_on_a_missing_post_is_not_found() {
    let app = test_app!();
    let token = signup!(&app, "alice", "secret1");

    let req = test::TestRequest::post()
        .uri(&format!("/api/blogs/comments/{}", uuid::Uuid::new_v4()))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"content": "hello"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn comment_listing_is_public_and_joins_author() {
    let app = test_app!();
    let token = signup!(&app, "alice", "secret1");
    let post_id = create_post!(&app, token, "T", "C");

    let req = test::TestRequest::post()
        .uri(&format!("/api/blogs/comments/{}", post_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"content": "first!"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    // No Authorization header on the listing
    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/comments/{}", post_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["content"], "first!");
    assert_eq!(body["data"][0]["author"], "alice");
}

#[actix_web::test]
async fn comment_reached_through_wrong_post_is_not_found() {
    let app = test_app!();
    let token = signup!(&app, "alice", "secret1");
    let post_a = create_post!(&app, token, "A", "a");
    let post_b = create_post!(&app, token, "B", "b");

    let req = test::TestRequest::post()
        .uri(&format!("/api/blogs/comments/{}", post_a))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"content": "on post A"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let comment_id = body["data"]["id"].as_str().unwrap().to_string();

    // Updating through post B's path must not find the comment
    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/comments/{}/{}", post_b, comment_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"content": "sneaky"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    // The right path works
    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/comments/{}/{}", post_a, comment_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"content": "edited"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["content"], "edited");
}

#[actix_web::test]
async fn only_the_author_may_mutate_content() {
    let app = test_app!();
    let alice = signup!(&app, "alice", "secret1");
    let bob = signup!(&app, "bob", "secret2");
    let post_id = create_post!(&app, alice, "T", "C");

    let req = test::TestRequest::put()
        .uri(&format!("/api/blogs/{}", post_id))
        .insert_header(("Authorization", format!("Bearer {}", bob)))
        .set_json(json!({"title": "hijacked"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blogs/{}", post_id))
        .insert_header(("Authorization", format!("Bearer {}", bob)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
}

#[actix_web::test]
async fn deleting_a_post_removes_its_comments() {
    let app = test_app!();
    let token = signup!(&app, "alice", "secret1");
    let post_id = create_post!(&app, token, "T", "C");

    let req = test::TestRequest::post()
        .uri(&format!("/api/blogs/comments/{}", post_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"content": "soon gone"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blogs/{}", post_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/comments/{}", post_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn full_register_login_post_lifecycle() {
    let app = test_app!();
    let token = signup!(&app, "alice", "secret1");
    let post_id = create_post!(&app, token, "T", "C");

    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{}", post_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "T");
    assert_eq!(body["data"]["content"], "C");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blogs/{}", post_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blogs/{}", post_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn health_check_responds() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}
