mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{admin, enterprise, published_job, send, setup, student, unique_phone};

#[tokio::test]
async fn admin_routes_require_staff() {
    let Some(app) = setup().await else { return };
    let token = student(&app).await;

    let (status, _) = send(&app, Method::GET, "/api/admin/dashboard/stats", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/admin/dashboard/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/api/admin/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn dashboard_has_a_seven_day_trend() {
    let Some(app) = setup().await else { return };
    let staff = admin(&app).await;
    student(&app).await;

    let (status, stats) = send(&app, Method::GET, "/api/admin/dashboard/stats", Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK, "{}", stats);
    let trend = stats["trends"]["daily_registrations"].as_array().unwrap();
    assert_eq!(trend.len(), 7);
    assert!(trend[6]["count"].as_i64().unwrap() >= 2);
    assert!(stats["user_stats"]["total"].as_i64().unwrap() >= 2);

    let (status, public) = send(&app, Method::GET, "/api/stats/dashboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(public["totalUsers"].as_i64().unwrap() >= 2);
}

#[tokio::test]
async fn user_management() {
    let Some(app) = setup().await else { return };
    let staff = admin(&app).await;

    let phone = unique_phone();
    let (_, registered) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "phone": phone,
            "user_type": "student",
            "password": "Secur3Pass!",
            "password_confirm": "Secur3Pass!"
        })),
    )
    .await;
    let user_id = registered["user_id"].as_i64().unwrap();

    let (status, page) = send(
        &app,
        Method::GET,
        &format!("/api/admin/users?search={}", phone),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["id"], user_id);

    let toggle = format!("/api/admin/users/{}/toggle-status", user_id);
    let (status, body) = send(&app, Method::POST, &toggle, Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "phone": phone, "password": "Secur3Pass!" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = send(&app, Method::POST, &toggle, Some(&staff), None).await;
    assert_eq!(body["is_active"], true);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/admin/users/{}/reset-password", user_id),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "phone": phone, "password": "123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn job_moderation_and_settings() {
    let Some(app) = setup().await else { return };
    let staff = admin(&app).await;
    let company = enterprise(&app).await;
    let applicant = student(&app).await;
    let job_id = published_job(&app, &company).await;

    send(
        &app,
        Method::POST,
        "/api/applications",
        Some(&applicant),
        Some(json!({ "job_id": job_id })),
    )
    .await;

    let (status, applicants) = send(
        &app,
        Method::GET,
        &format!("/api/admin/jobs/{}/applications", job_id),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(applicants["count"], 1);
    assert_eq!(applicants["results"][0]["status"], "pending");

    let status_uri = format!("/api/admin/jobs/{}/status", job_id);
    let (status, _) = send(
        &app,
        Method::POST,
        &status_uri,
        Some(&staff),
        Some(json!({ "status": "archived" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, job) = send(
        &app,
        Method::POST,
        &status_uri,
        Some(&staff),
        Some(json!({ "status": "closed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", job);
    assert_eq!(job["status"], "closed");

    let (status, settings) = send(&app, Method::GET, "/api/admin/system/settings", Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(settings["platform_name"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/admin/system/settings",
        Some(&staff),
        Some(json!({ "platform_name": "", "contact_email": "a@b.c", "service_phone": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["platform_name"].is_array());
}
