// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! End-to-end tests driving the HTTP router.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use commex_server::{
    api::router,
    state::AppState,
    storage::{seed_catalog, CommexDatabase},
};

fn app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = CommexDatabase::open(&dir.path().join("commex.redb")).unwrap();
    seed_catalog(&db).unwrap();
    (router(AppState::new(db)), dir)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_member(app: &Router, code: &str) -> u64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/v1/members",
        Some(json!({
            "member_code": code,
            "first_name": "John",
            "last_name": "Doe",
            "email": "john.doe@example.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_u64().unwrap()
}

async fn status_id(app: &Router, code: &str) -> u64 {
    let (status, body) = send(app, Method::GET, &format!("/v1/globalstatuses/code/{code}"), None).await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_u64().unwrap()
}

#[tokio::test]
async fn communication_lifecycle() {
    let (app, _dir) = app();
    let member_id = create_member(&app, "M12345").await;
    let ready_id = status_id(&app, "ReadyForRelease").await;
    let printed_id = status_id(&app, "Printed").await;

    // Create without an initial status
    let (status, created) = send(
        &app,
        Method::POST,
        "/v1/communications",
        Some(json!({
            "member_id": member_id,
            "communication_type_id": 1,
            "title": "New EOB"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["current_status_id"].as_u64(), Some(ready_id));
    assert_eq!(created["current_status"], "ReadyForRelease");
    assert_eq!(created["member_name"], "John Doe");
    let id = created["id"].as_u64().unwrap();

    // Patch the title only
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/v1/communications/{id}"),
        Some(json!({ "title": "Updated EOB" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Move to Printed
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/v1/communications/{id}/status"),
        Some(json!({ "status_id": printed_id, "notes": "Batch 7" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, loaded) = send(&app, Method::GET, &format!("/v1/communications/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded["title"], "Updated EOB");
    assert_eq!(loaded["current_status"], "Printed");
    let history = loaded["status_history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["status_code"], "Printed");
    assert_eq!(history[1]["notes"], "Batch 7");

    // Filter by status
    let (_, listed) = send(
        &app,
        Method::GET,
        &format!("/v1/communications?status_id={printed_id}"),
        None,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Delete twice
    let (status, _) = send(&app, Method::DELETE, &format!("/v1/communications/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::DELETE, &format!("/v1/communications/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], format!("Communication with ID {id} not found"));

    let (_, listed) = send(&app, Method::GET, "/v1/communications", None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_with_unknown_member_is_404() {
    let (app, _dir) = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/communications",
        Some(json!({
            "member_id": 999,
            "communication_type_id": 1,
            "title": "Orphan"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Member with ID 999 not found");
}

#[tokio::test]
async fn update_unknown_communication_is_404() {
    let (app, _dir) = app();
    let (status, _) = send(
        &app,
        Method::PUT,
        "/v1/communications/999",
        Some(json!({ "title": "Nothing" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_status_code_is_400() {
    let (app, _dir) = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/globalstatuses",
        Some(json!({
            "status_code": "Printed",
            "display_name": "Printed",
            "phase": "Production"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Status code already exists"));
}

#[tokio::test]
async fn created_resources_carry_location() {
    let (app, _dir) = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/globalstatuses")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "status_code": "Scanned",
                "display_name": "Scanned",
                "phase": "Logistics"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/v1/globalstatuses/"));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let (app, _dir) = app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn readiness_and_docs_are_served() {
    let (app, _dir) = app();

    let (status, body) = send(&app, Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"], "ok");

    let (status, doc) = send(&app, Method::GET, "/api-doc/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/v1/communications"].is_object());
}

#[tokio::test]
async fn member_lookup_by_code_and_type_statuses() {
    let (app, _dir) = app();
    let member_id = create_member(&app, "M77777").await;

    let (status, member) = send(&app, Method::GET, "/v1/members/code/M77777", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(member["id"].as_u64(), Some(member_id));
    assert_eq!(member["communication_count"], 0);

    let (status, statuses) = send(&app, Method::GET, "/v1/communication-types/1/statuses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(statuses
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["status_code"] == "ReadyForRelease"));
}

#[tokio::test]
async fn malformed_bodies_are_400_with_json_error() {
    let (app, _dir) = app();
    let member_id = create_member(&app, "M12345").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/communications",
        Some(json!({ "member_id": member_id, "communication_type_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("title"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/globalstatuses",
        Some(json!({
            "status_code": "Scanned",
            "display_name": "Scanned",
            "phase": "Bogus"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Bogus"));

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/v1/members/1")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn body_without_json_content_type_gets_json_error() {
    let (app, _dir) = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/members")
        .body(Body::from(r#"{"member_code":"M1"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn bad_path_and_query_values_are_400() {
    let (app, _dir) = app();

    let (status, body) = send(&app, Method::GET, "/v1/communications/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, Method::GET, "/v1/globalstatuses?phase=Bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, Method::GET, "/v1/members?include_inactive=maybe", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn communications_are_paged_on_request() {
    let (app, _dir) = app();
    let member_id = create_member(&app, "M12345").await;
    for title in ["First", "Second", "Third"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/v1/communications",
            Some(json!({
                "member_id": member_id,
                "communication_type_id": 1,
                "title": title
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let titles = |body: &Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|c| c["title"].as_str().unwrap().to_string())
            .collect()
    };

    let (status, body) = send(&app, Method::GET, "/v1/communications?page=2&page_size=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Second"]);

    let (_, body) = send(&app, Method::GET, "/v1/communications?page=2&page_size=2", None).await;
    assert_eq!(titles(&body), vec!["Third"]);

    let (status, body) = send(&app, Method::GET, "/v1/communications?page=5&page_size=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = send(&app, Method::GET, "/v1/communications?page=1", None).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    for query in ["page=0", "page_size=0", "page_size=101"] {
        let (status, body) = send(&app, Method::GET, &format!("/v1/communications?{query}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
        assert!(body["error"].as_str().unwrap().starts_with("Page"));
    }
}
