mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{admin, send, setup, student};

#[tokio::test]
async fn feedback_thread_and_admin_resolution() {
    let Some(app) = setup().await else { return };
    let owner = student(&app).await;
    let stranger = student(&app).await;
    let staff = admin(&app).await;

    let (status, categories) = send(&app, Method::GET, "/api/feedback/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let category_id = categories["results"][0]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/feedback",
        Some(&owner),
        Some(json!({ "category_id": 999_999, "title": "Bad", "content": "Unknown category" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/feedback",
        Some(&owner),
        Some(json!({
            "category_id": category_id,
            "title": "Search is slow",
            "content": "Job search takes several seconds."
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["status"], "pending");
    let id = created["id"].as_i64().unwrap();

    let (_, mine) = send(&app, Method::GET, "/api/feedback", Some(&owner), None).await;
    assert_eq!(mine["count"], 1);

    let (status, _) = send(&app, Method::GET, &format!("/api/feedback/{}", id), Some(&stranger), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/feedback/{}/reply", id),
        Some(&stranger),
        Some(json!({ "content": "me too" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/feedback/{}/reply", id),
        Some(&owner),
        Some(json!({ "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, reply) = send(
        &app,
        Method::POST,
        &format!("/api/feedback/{}/reply", id),
        Some(&owner),
        Some(json!({ "content": "Mostly on mobile." })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", reply);
    assert_eq!(reply["is_admin_reply"], false);

    let (status, resolved) = send(
        &app,
        Method::POST,
        &format!("/api/admin/feedbacks/{}/reply", id),
        Some(&staff),
        Some(json!({ "reply": "Fixed in the latest release." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", resolved);
    assert_eq!(resolved["status"], "resolved");
    assert!(resolved["resolved_at"].is_string());
    assert_eq!(resolved["admin_reply"], "Fixed in the latest release.");

    let (_, detail) = send(&app, Method::GET, &format!("/api/feedback/{}", id), Some(&owner), None).await;
    assert_eq!(detail["replies"][0]["content"], "Mostly on mobile.");

    let (_, notifications) = send(&app, Method::GET, "/api/feedback/notifications", Some(&owner), None).await;
    assert_eq!(notifications["count"], 1);
    assert_eq!(notifications["results"][0]["notification_type"], "feedback");
    assert_eq!(notifications["results"][0]["related_object_id"], id);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/admin/feedbacks/{}/status", id),
        Some(&staff),
        Some(json!({ "status": "archived" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn marking_read_is_idempotent() {
    let Some(app) = setup().await else { return };
    let owner = student(&app).await;
    let stranger = student(&app).await;
    let staff = admin(&app).await;

    for title in ["First", "Second"] {
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/feedback",
            Some(&owner),
            Some(json!({ "title": title, "content": "Please look into it" })),
        )
        .await;
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/admin/feedbacks/{}/reply", created["id"]),
            Some(&staff),
            Some(json!({ "reply": "Done" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, unread) = send(&app, Method::GET, "/api/feedback/notifications/unread-count", Some(&owner), None).await;
    assert_eq!(unread["count"], 2);

    let (_, list) = send(&app, Method::GET, "/api/feedback/notifications", Some(&owner), None).await;
    let first_id = list["results"][0]["id"].as_i64().unwrap();
    let uri = format!("/api/feedback/notifications/{}/read", first_id);

    let (status, _) = send(&app, Method::POST, &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, once) = send(&app, Method::POST, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(once["is_read"], true);
    let (_, twice) = send(&app, Method::POST, &uri, Some(&owner), None).await;
    assert_eq!(once["read_at"], twice["read_at"]);

    let (status, marked) = send(
        &app,
        Method::POST,
        "/api/feedback/notifications/mark-read",
        Some(&owner),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marked["count"], 1);

    let (_, unread) = send(&app, Method::GET, "/api/feedback/notifications/unread-count", Some(&owner), None).await;
    assert_eq!(unread["count"], 0);
}
