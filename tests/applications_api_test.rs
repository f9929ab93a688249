mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{enterprise, published_job, register_and_login, send, setup, student};

#[tokio::test]
async fn apply_once_then_conflict() {
    let Some(app) = setup().await else { return };
    let company = enterprise(&app).await;
    let job_id = published_job(&app, &company).await;
    let applicant = student(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/applications",
        Some(&applicant),
        Some(json!({ "job_id": job_id, "cover_letter": "I write Rust." })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["applicant_school"], "Test University");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/applications",
        Some(&applicant),
        Some(json!({ "job_id": job_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You have already applied to this job");

    let (_, job) = send(&app, Method::GET, &format!("/api/jobs/{}", job_id), None, None).await;
    assert_eq!(job["application_count"], 1);

    // Enterprises do not apply.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/applications",
        Some(&company),
        Some(json!({ "job_id": job_id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn students_without_profile_or_closed_jobs_are_refused() {
    let Some(app) = setup().await else { return };
    let company = enterprise(&app).await;
    let job_id = published_job(&app, &company).await;

    let bare = register_and_login(&app, "student").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/applications",
        Some(&bare),
        Some(json!({ "job_id": job_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(
        body["error"],
        "No student profile, complete your profile before applying"
    );
    assert!(body["fields"]["applicant"].is_array());

    let applicant = student(&app).await;
    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/jobs/{}", job_id),
        Some(&company),
        Some(json!({ "status": "closed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/applications",
        Some(&applicant),
        Some(json!({ "job_id": job_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Job is not open for applications");
}

#[tokio::test]
async fn status_changes_are_logged_and_scoped() {
    let Some(app) = setup().await else { return };
    let company = enterprise(&app).await;
    let rival = enterprise(&app).await;
    let job_id = published_job(&app, &company).await;
    let applicant = student(&app).await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/applications",
        Some(&applicant),
        Some(json!({ "job_id": job_id })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // Another company can neither see nor reject it.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/applications/{}/reject", id),
        Some(&rival),
        Some(json!({ "reason": "no" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::GET, &format!("/api/applications/{}", id), Some(&rival), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, listed) = send(&app, Method::GET, "/api/applications", Some(&rival), None).await;
    assert_eq!(listed["count"], 0);

    let (_, logs) = send(&app, Method::GET, &format!("/api/applications/{}/logs", id), Some(&company), None).await;
    assert_eq!(logs["count"], 0);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/applications/{}", id),
        Some(&company),
        Some(json!({ "status": "reviewing", "hr_notes": "Strong CV" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "reviewing");

    // Same status again writes no log row.
    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/applications/{}", id),
        Some(&company),
        Some(json!({ "status": "reviewing" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/applications/{}/approve", id),
        Some(&company),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, logs) = send(&app, Method::GET, &format!("/api/applications/{}/logs", id), Some(&applicant), None).await;
    assert_eq!(logs["count"], 2, "{}", logs);
    assert_eq!(logs["results"][0]["old_status"], "reviewing");
    assert_eq!(logs["results"][0]["new_status"], "accepted");
    assert_eq!(logs["results"][1]["old_status"], "pending");
    assert_eq!(logs["results"][1]["reason"], "Strong CV");

    let (_, detail) = send(&app, Method::GET, &format!("/api/applications/{}", id), Some(&applicant), None).await;
    assert_eq!(detail["status"], "accepted");
    assert!(detail["reviewed_at"].is_string());

    let (_, unread) = send(
        &app,
        Method::GET,
        "/api/feedback/notifications/unread-count",
        Some(&applicant),
        None,
    )
    .await;
    assert_eq!(unread["count"], 2);
}

#[tokio::test]
async fn withdraw_and_interviews() {
    let Some(app) = setup().await else { return };
    let company = enterprise(&app).await;
    let job_id = published_job(&app, &company).await;
    let applicant = student(&app).await;
    let other_student = student(&app).await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/applications",
        Some(&applicant),
        Some(json!({ "job_id": job_id })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, interview) = send(
        &app,
        Method::POST,
        &format!("/api/applications/{}/interviews", id),
        Some(&company),
        Some(json!({
            "interview_type": "video",
            "scheduled_time": "2030-01-15T09:30:00Z",
            "duration": 45,
            "location": "https://meet.example.com/room"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", interview);
    assert_eq!(interview["status"], "scheduled");
    let interview_id = interview["id"].as_i64().unwrap();

    let (_, detail) = send(&app, Method::GET, &format!("/api/applications/{}", id), Some(&applicant), None).await;
    assert_eq!(detail["status"], "interview");

    let (_, mine) = send(&app, Method::GET, "/api/applications/interviews", Some(&applicant), None).await;
    assert_eq!(mine["count"], 1);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/applications/interviews/{}", interview_id),
        Some(&company),
        Some(json!({ "score": 101 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &format!("/api/applications/interviews/{}", interview_id),
        Some(&company),
        Some(json!({ "status": "completed", "score": 88, "feedback": "Solid" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["score"], 88);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/applications/{}/withdraw", id),
        Some(&other_student),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/applications/{}/withdraw", id),
        Some(&applicant),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = send(&app, Method::GET, &format!("/api/applications/{}", id), Some(&applicant), None).await;
    assert_eq!(detail["status"], "withdrawn");
}
