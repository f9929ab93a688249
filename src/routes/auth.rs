use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, State},
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    dto::{
        auth_dto::{
            LoginPayload, LoginResponse, RefreshPayload, RefreshResponse, RegisterPayload,
            RegisterResponse,
        },
        MessageResponse,
    },
    extract::Json,
    error::Result,
    middleware::auth::CurrentActor,
    services::user_service::LoginContext,
    AppState,
};

/// First `X-Forwarded-For` hop when present, otherwise the peer address.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
        .or_else(|| peer.map(|p| p.ip()))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Account created", body = Json<RegisterResponse>),
        (status = 400, description = "Invalid payload or phone already registered")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_service.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".to_string(),
            user_id: user.id,
            phone: user.phone,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token pair issued", body = Json<LoginResponse>),
        (status = 401, description = "Invalid credentials or disabled account")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let ctx = LoginContext {
        ip: client_ip(&headers, peer.map(|ConnectInfo(addr)| addr)),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
    };
    let (user, tokens) = state
        .user_service
        .login(&payload.phone, &payload.password, ctx)
        .await?;
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        access_token: tokens.access,
        refresh_token: tokens.refresh,
        user: user.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/token/refresh",
    request_body = RefreshPayload,
    responses(
        (status = 200, description = "New access token", body = Json<RefreshResponse>),
        (status = 401, description = "Refresh token invalid or expired")
    )
)]
#[axum::debug_handler]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let access_token = state.user_service.refresh(&payload.refresh_token).await?;
    Ok(Json(RefreshResponse { access_token }))
}

/// Tokens are stateless, so this only acknowledges the client dropping them.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = Json<MessageResponse>)
    )
)]
#[axum::debug_handler]
pub async fn logout(CurrentActor(actor): CurrentActor) -> Result<impl IntoResponse> {
    tracing::info!(user_id = actor.id(), "user logged out");
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_header_wins_over_peer() {
        let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(
            client_ip(&headers, Some(peer)),
            Some("10.0.0.1".parse().unwrap())
        );

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.2"),
        );
        assert_eq!(
            client_ip(&headers, Some(peer)),
            Some("203.0.113.7".parse().unwrap())
        );
        assert_eq!(client_ip(&HeaderMap::new(), None), None);
    }
}
