//! Integration tests for the admin review area.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL; without it every test returns early.

mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{
    admin_user, approved_user, cleanup_users, create_test_app, get_request_with_auth,
    json_request_with_auth, location, parse_response_body, post_request_with_auth, seed_profile,
    setup, test_config, TestUser,
};
use domain::models::profile::ProfileStatus;
use maknoon_api::app::{build_router, AppState};
use serde_json::json;
use std::time::Duration;
use tower::ServiceExt;

async fn pending_user(pool: &sqlx::PgPool) -> TestUser {
    let user = TestUser::new();
    seed_profile(pool, &user, "pending_review", "user").await;
    user
}

async fn profile_of(app: &Router, user: &TestUser) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(get_request_with_auth("/api/v1/profile", &user.token))
        .await
        .unwrap();
    parse_response_body(response).await
}

#[tokio::test]
async fn test_pending_queue_lists_submitted_profiles() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(test_config(), pool.clone());
    let admin = admin_user(&pool).await;
    let applicant = pending_user(&pool).await;

    let response = app
        .oneshot(get_request_with_auth(
            "/api/v1/admin/profiles/pending",
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let ids: Vec<&str> = body["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&applicant.id.to_string().as_str()));
    assert!(!ids.contains(&admin.id.to_string().as_str()));

    cleanup_users(&pool, &[&admin, &applicant]).await;
}

#[tokio::test]
async fn test_approve_pending_profile() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(test_config(), pool.clone());
    let admin = admin_user(&pool).await;
    let applicant = pending_user(&pool).await;
    let uri = format!("/api/v1/admin/profiles/{}/approve", applicant.id);

    let response = app
        .clone()
        .oneshot(post_request_with_auth(&uri, &admin.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["profile_status"], "approved");

    let profile = profile_of(&app, &applicant).await;
    assert_eq!(profile["profile_status"], "approved");
    assert_eq!(profile["reviewed_by"], admin.id.to_string());

    // Approved is terminal.
    let response = app
        .oneshot(post_request_with_auth(&uri, &admin.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    cleanup_users(&pool, &[&admin, &applicant]).await;
}

#[tokio::test]
async fn test_approval_is_pushed_to_status_watchers() {
    let Some(pool) = setup().await else { return };
    let state = AppState::new(test_config(), pool.clone()).expect("test state");
    let app = build_router(state.clone());
    let admin = admin_user(&pool).await;
    let applicant = pending_user(&pool).await;

    let mut watcher = state.status_hub.subscribe(applicant.id);

    let uri = format!("/api/v1/admin/profiles/{}/approve", applicant.id);
    let response = app
        .oneshot(post_request_with_auth(&uri, &admin.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let event = tokio::time::timeout(Duration::from_secs(5), watcher.recv())
        .await
        .expect("status event within timeout")
        .expect("open subscription");
    assert_eq!(event.profile_id, applicant.id);
    assert_eq!(event.profile_status, ProfileStatus::Approved);
    assert_eq!(event.redirect_to, "/");

    cleanup_users(&pool, &[&admin, &applicant]).await;
}

#[tokio::test]
async fn test_reject_with_reason_then_resubmit_clears_it() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(test_config(), pool.clone());
    let admin = admin_user(&pool).await;
    let applicant = pending_user(&pool).await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/admin/profiles/{}/reject", applicant.id),
            &admin.token,
            json!({ "reason": "photo unclear" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_response_body(response).await["profile_status"], "rejected");

    let profile = profile_of(&app, &applicant).await;
    assert_eq!(profile["profile_status"], "rejected");
    assert_eq!(profile["rejection_reason"], "photo unclear");

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/profile/submit",
            &applicant.token,
            json!({
                "bio": "New clearer photo attached.",
                "date_of_birth": "1993-07-19",
                "gender": "male",
                "location": "Bradford"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let profile = profile_of(&app, &applicant).await;
    assert_eq!(profile["profile_status"], "pending_review");
    assert!(profile["rejection_reason"].is_null());

    cleanup_users(&pool, &[&admin, &applicant]).await;
}

#[tokio::test]
async fn test_reject_without_body() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(test_config(), pool.clone());
    let admin = admin_user(&pool).await;
    let applicant = pending_user(&pool).await;

    let response = app
        .clone()
        .oneshot(post_request_with_auth(
            &format!("/api/v1/admin/profiles/{}/reject", applicant.id),
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let profile = profile_of(&app, &applicant).await;
    assert_eq!(profile["profile_status"], "rejected");
    assert!(profile["rejection_reason"].is_null());

    cleanup_users(&pool, &[&admin, &applicant]).await;
}

#[tokio::test]
async fn test_review_of_non_pending_profile_is_a_state_error() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(test_config(), pool.clone());
    let admin = admin_user(&pool).await;
    let incomplete = TestUser::new();
    seed_profile(&pool, &incomplete, "incomplete", "user").await;

    let response = app
        .oneshot(post_request_with_auth(
            &format!("/api/v1/admin/profiles/{}/reject", incomplete.id),
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(parse_response_body(response).await["error"], "invalid_state");

    cleanup_users(&pool, &[&admin, &incomplete]).await;
}

#[tokio::test]
async fn test_review_of_unknown_profile_is_not_found() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(test_config(), pool.clone());
    let admin = admin_user(&pool).await;

    let response = app
        .oneshot(post_request_with_auth(
            &format!("/api/v1/admin/profiles/{}/approve", uuid::Uuid::new_v4()),
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    cleanup_users(&pool, &[&admin]).await;
}

#[tokio::test]
async fn test_non_admin_is_redirected_home() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(test_config(), pool.clone());
    let user = approved_user(&pool).await;
    let applicant = pending_user(&pool).await;

    let response = app
        .clone()
        .oneshot(post_request_with_auth(
            &format!("/api/v1/admin/profiles/{}/approve", applicant.id),
            &user.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/"));

    // The handler never ran.
    let profile = profile_of(&app, &applicant).await;
    assert_eq!(profile["profile_status"], "pending_review");

    cleanup_users(&pool, &[&user, &applicant]).await;
}

#[tokio::test]
async fn test_admin_test_chat_is_reused() {
    let Some(pool) = setup().await else { return };
    let app = create_test_app(test_config(), pool.clone());
    let admin = admin_user(&pool).await;

    let mut room_ids = Vec::new();
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_request_with_auth("/api/v1/admin/test-chat", &admin.token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let room = parse_response_body(response).await;
        assert!(room["connection_id"].is_null());
        room_ids.push(room["id"].as_str().unwrap().to_string());
    }
    assert_eq!(room_ids[0], room_ids[1]);

    let response = app
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/rooms/{}/messages", room_ids[0]),
            &admin.token,
            json!({ "text": "testing" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    cleanup_users(&pool, &[&admin]).await;
}
