#![allow(dead_code)]

use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

/// Builds the full router against `DATABASE_URL`; `None` when no database is configured.
pub async fn setup() -> Option<Router> {
    dotenvy::dotenv().ok();
    if env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    }
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("API_RPS", "10000");
    env::set_var(
        "UPLOADS_DIR",
        env::temp_dir().join("employment-platform-tests"),
    );

    let _ = employment_platform::config::init_config();

    let pool = employment_platform::database::pool::create_pool()
        .await
        .expect("pool");
    employment_platform::database::pool::run_migrations(&pool)
        .await
        .expect("migrations");

    let state = employment_platform::AppState::new(pool);
    Some(employment_platform::routes::api_router(state))
}

/// A fresh 11-digit phone number so runs never collide.
pub fn unique_phone() -> String {
    let n = Uuid::new_v4().as_u128() % 1_000_000_000;
    format!("13{:09}", n)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, json)
}

/// Registers and logs in; returns the access token.
pub async fn register_and_login(app: &Router, user_type: &str) -> String {
    let phone = unique_phone();
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "phone": phone,
            "user_type": user_type,
            "real_name": format!("Test {}", user_type),
            "password": "Secur3Pass!",
            "password_confirm": "Secur3Pass!"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register: {}", body);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "phone": phone, "password": "Secur3Pass!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}

pub async fn student(app: &Router) -> String {
    let token = register_and_login(app, "student").await;
    let (status, body) = send(
        app,
        Method::PATCH,
        "/api/users/student-profiles/me",
        Some(&token),
        Some(json!({ "school": "Test University", "major": "Computer Science" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "student profile: {}", body);
    token
}

pub async fn enterprise(app: &Router) -> String {
    let token = register_and_login(app, "enterprise").await;
    let code = Uuid::new_v4().simple().to_string();
    let (status, body) = send(
        app,
        Method::PUT,
        "/api/users/enterprise-profiles/me",
        Some(&token),
        Some(json!({
            "company_name": format!("Company {}", &code[..8]),
            "company_code": &code[..20],
            "industry": "Software"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "enterprise profile: {}", body);
    token
}

/// Creates a published job and returns its id.
pub async fn published_job(app: &Router, enterprise_token: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/jobs",
        Some(enterprise_token),
        Some(json!({
            "title": "Backend Intern",
            "job_type": "internship",
            "salary_min": 3000,
            "salary_max": 5000,
            "salary_type": "monthly",
            "work_city": "Shanghai",
            "skills_required": ["Rust", "SQL"],
            "description": "Work on the API",
            "status": "published"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create job: {}", body);
    body["id"].as_i64().unwrap()
}

/// Administrators cannot self-register, so one is created the way startup bootstraps it.
pub async fn admin(app: &Router) -> String {
    let phone = unique_phone();
    let pool = employment_platform::database::pool::create_pool()
        .await
        .expect("pool");
    employment_platform::services::user_service::UserService::new(pool)
        .create_superuser(&phone, "Adm1nPass!")
        .await
        .expect("create admin");

    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "phone": phone, "password": "Adm1nPass!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}
