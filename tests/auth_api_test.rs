mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{send, setup, unique_phone};

#[tokio::test]
async fn register_login_refresh_and_profile() {
    let Some(app) = setup().await else { return };
    let phone = unique_phone();

    let (status, body) = send(
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
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["phone"], phone.as_str());

    // Same phone again.
    let (status, _) = send(
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
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "phone": phone, "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "phone": phone, "password": "Secur3Pass!" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let access = body["access_token"].as_str().unwrap().to_string();
    let refresh = body["refresh_token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["user_type"], "student");

    let (status, body) = send(&app, Method::GET, "/api/users/me", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["phone"], phone.as_str());
    assert_eq!(body["roles"][0]["name"], "student");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/token/refresh",
        None,
        Some(json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["access_token"].as_str().is_some());

    // An access token is not accepted as a refresh token.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/token/refresh",
        None,
        Some(json!({ "refresh_token": access })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mismatched_password_confirmation_is_rejected() {
    let Some(app) = setup().await else { return };
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "phone": unique_phone(),
            "user_type": "enterprise",
            "password": "Secur3Pass!",
            "password_confirm": "Different1!"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["password_confirm"].is_array(), "{}", body);
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let Some(app) = setup().await else { return };

    let (status, _) = send(&app, Method::GET, "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/users/me", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/does-not-exist", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}
