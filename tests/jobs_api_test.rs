mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

use common::{enterprise, published_job, send, setup, student};

#[tokio::test]
async fn detail_views_are_counted_and_drafts_hidden() {
    let Some(app) = setup().await else { return };
    let company = enterprise(&app).await;
    let job_id = published_job(&app, &company).await;
    let uri = format!("/api/jobs/{}", job_id);

    let (status, first) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK, "{}", first);
    let (status, second) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        second["view_count"].as_i64().unwrap(),
        first["view_count"].as_i64().unwrap() + 1
    );
    assert_eq!(first["view_count"].as_i64().unwrap(), 1);
    assert_eq!(first["is_favorited"], false);

    let (status, draft) = send(
        &app,
        Method::POST,
        "/api/jobs",
        Some(&company),
        Some(json!({
            "title": "Unannounced role",
            "job_type": "full_time",
            "work_city": "Beijing",
            "description": "Not yet public"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", draft);
    assert_eq!(draft["status"], "draft");
    let draft_uri = format!("/api/jobs/{}", draft["id"]);

    let (status, _) = send(&app, Method::GET, &draft_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, &draft_uri, Some(&company), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn inverted_salary_range_creates_nothing() {
    let Some(app) = setup().await else { return };
    let company = enterprise(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/jobs",
        Some(&company),
        Some(json!({
            "title": "Impossible pay",
            "job_type": "full_time",
            "salary_min": 25000,
            "salary_max": 15000,
            "work_city": "Shenzhen",
            "description": "Should be refused"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert!(body["fields"]["salary_min"].is_array(), "{}", body);

    let (status, mine) = send(&app, Method::GET, "/api/jobs/enterprise", Some(&company), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["count"], 0);
}

#[tokio::test]
async fn students_cannot_post_jobs() {
    let Some(app) = setup().await else { return };
    let token = student(&app).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/jobs",
        Some(&token),
        Some(json!({
            "title": "Side gig",
            "job_type": "part_time",
            "work_city": "Hangzhou",
            "description": "Nope"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["company"].is_array(), "{}", body);
}

#[tokio::test]
async fn favoriting_twice_keeps_one_row() {
    let Some(app) = setup().await else { return };
    let company = enterprise(&app).await;
    let job_id = published_job(&app, &company).await;
    let token = student(&app).await;
    let uri = format!("/api/jobs/{}/favorite", job_id);

    let (status, body) = send(&app, Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Job favorited");

    let (status, body) = send(&app, Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job already favorited");

    let (status, favorites) = send(&app, Method::GET, "/api/jobs/favorites", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(favorites["count"], 1);
    assert_eq!(favorites["results"][0]["job"]["id"], job_id);

    let (_, detail) = send(
        &app,
        Method::GET,
        &format!("/api/jobs/{}", job_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(detail["is_favorited"], true);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_owning_company_edits_a_job() {
    let Some(app) = setup().await else { return };
    let owner = enterprise(&app).await;
    let other = enterprise(&app).await;
    let job_id = published_job(&app, &owner).await;
    let uri = format!("/api/jobs/{}", job_id);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&other),
        Some(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&owner),
        Some(json!({ "title": "Backend Intern (Rust)" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["title"], "Backend Intern (Rust)");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_input_gets_json_errors() {
    let Some(app) = setup().await else { return };
    let company = enterprise(&app).await;

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/jobs")
        .header(header::AUTHORIZATION, format!("Bearer {}", company))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(res.into_body(), 64 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());

    let (status, body) = send(&app, Method::GET, "/api/jobs?category=abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn out_of_range_pages_are_empty() {
    let Some(app) = setup().await else { return };

    let uri = format!("/api/jobs?page={}", i64::MAX);
    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["results"].as_array().map(Vec::len), Some(0));
}
