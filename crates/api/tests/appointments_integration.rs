//! Integration tests for appointment endpoints.
//!
//! These tests require a running PostgreSQL instance. Set the
//! TEST_DATABASE_URL environment variable to enable them; they skip
//! otherwise.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_authenticated_user, create_test_app, create_test_appointment, create_test_group,
    json_request_with_auth, parse_response_body, request_with_auth, test_config,
    try_create_test_pool, TestUser,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_list_appointments_without_group_is_empty() {
    let Some(pool) = try_create_test_pool().await else {
        return;
    };
    let app = create_test_app(test_config(), pool.clone());

    let auth = create_authenticated_user(&app, &TestUser::new()).await;

    let request = request_with_auth(Method::GET, "/api/appointments", &auth.token);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_appointment_without_group_conflicts() {
    let Some(pool) = try_create_test_pool().await else {
        return;
    };
    let app = create_test_app(test_config(), pool.clone());

    let auth = create_authenticated_user(&app, &TestUser::new()).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/appointments",
        json!({
            "title": "Checkup",
            "start": "2026-09-01T09:00:00Z",
            "end": "2026-09-01T09:30:00Z",
        }),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_appointment_stamps_creator() {
    let Some(pool) = try_create_test_pool().await else {
        return;
    };
    let app = create_test_app(test_config(), pool.clone());

    let user = TestUser::new();
    let auth = create_authenticated_user(&app, &user).await;
    create_test_group(&app, &auth).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/appointments",
        json!({
            "title": "Cardiology checkup",
            "start": "2026-09-01T09:00:00Z",
            "end": "2026-09-01T09:30:00Z",
            "doctorName": "Dr. Lee",
            "location": "Clinic B",
        }),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["createdBy"].as_str().unwrap(), user.username);
    assert_eq!(body["doctorName"].as_str().unwrap(), "Dr. Lee");
    assert_eq!(body["completed"].as_bool().unwrap(), false);
}

#[tokio::test]
async fn test_list_appointments_ordered_by_start() {
    let Some(pool) = try_create_test_pool().await else {
        return;
    };
    let app = create_test_app(test_config(), pool.clone());

    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    create_test_group(&app, &auth).await;

    let later = create_test_appointment(
        &app,
        &auth,
        "Later",
        "2026-09-02T09:00:00Z",
        "2026-09-02T09:30:00Z",
    )
    .await;
    let earlier = create_test_appointment(
        &app,
        &auth,
        "Earlier",
        "2026-09-01T09:00:00Z",
        "2026-09-01T09:30:00Z",
    )
    .await;

    let request = request_with_auth(Method::GET, "/api/appointments", &auth.token);
    let response = app.clone().oneshot(request).await.unwrap();
    let body = parse_response_body(response).await;

    let appointments = body.as_array().unwrap();
    assert_eq!(appointments.len(), 2);
    assert_eq!(appointments[0]["id"].as_str().unwrap(), earlier);
    assert_eq!(appointments[1]["id"].as_str().unwrap(), later);
}

#[tokio::test]
async fn test_update_appointment_partial_fields() {
    let Some(pool) = try_create_test_pool().await else {
        return;
    };
    let app = create_test_app(test_config(), pool.clone());

    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    create_test_group(&app, &auth).await;
    let id = create_test_appointment(
        &app,
        &auth,
        "Checkup",
        "2026-09-01T09:00:00Z",
        "2026-09-01T09:30:00Z",
    )
    .await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/appointments/{}", id),
        json!({ "summary": "Blood pressure stable" }),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["summary"].as_str().unwrap(), "Blood pressure stable");
    assert_eq!(body["title"].as_str().unwrap(), "Checkup");
}

#[tokio::test]
async fn test_update_appointment_of_other_group_not_found() {
    let Some(pool) = try_create_test_pool().await else {
        return;
    };
    let app = create_test_app(test_config(), pool.clone());

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    create_test_group(&app, &owner).await;
    let id = create_test_appointment(
        &app,
        &owner,
        "Checkup",
        "2026-09-01T09:00:00Z",
        "2026-09-01T09:30:00Z",
    )
    .await;

    let outsider = create_authenticated_user(&app, &TestUser::new()).await;
    create_test_group(&app, &outsider).await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/appointments/{}", id),
        json!({ "title": "Hijacked" }),
        &outsider.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_appointment_complete() {
    let Some(pool) = try_create_test_pool().await else {
        return;
    };
    let app = create_test_app(test_config(), pool.clone());

    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    create_test_group(&app, &auth).await;
    let id = create_test_appointment(
        &app,
        &auth,
        "Checkup",
        "2026-09-01T09:00:00Z",
        "2026-09-01T09:30:00Z",
    )
    .await;

    let request = request_with_auth(
        Method::PATCH,
        &format!("/api/appointments/{}/complete", id),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["completed"].as_bool().unwrap(), true);
}

#[tokio::test]
async fn test_delete_appointment_twice_not_found() {
    let Some(pool) = try_create_test_pool().await else {
        return;
    };
    let app = create_test_app(test_config(), pool.clone());

    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    create_test_group(&app, &auth).await;
    let id = create_test_appointment(
        &app,
        &auth,
        "Checkup",
        "2026-09-01T09:00:00Z",
        "2026-09-01T09:30:00Z",
    )
    .await;

    let request = request_with_auth(
        Method::DELETE,
        &format!("/api/appointments/{}", id),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = request_with_auth(
        Method::DELETE,
        &format!("/api/appointments/{}", id),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
