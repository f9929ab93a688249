use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::{Error, Result};
use crate::models::actor::Actor;
use crate::utils::token::{decode_token, TokenKind};
use crate::AppState;

/// Pulls the bearer token out of `Authorization`. `Ok(None)` means no header was sent.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>> {
    let Some(auth_header) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let auth_str = auth_header
        .to_str()
        .map_err(|_| Error::Unauthorized("bad_authorization".into()))?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::Unauthorized("unsupported_scheme".into()))?;
    Ok(Some(token))
}

async fn resolve(state: &AppState, token: &str) -> Result<Actor> {
    let config = crate::config::get_config();
    let claims = decode_token(&config.jwt_secret, token, TokenKind::Access)
        .map_err(|_| Error::Unauthorized("invalid_token".into()))?;
    state.user_service.resolve_actor(claims.user_id()?).await
}

/// Requires a valid access token and stores the resolved [`Actor`] on the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(req.headers())?
        .ok_or_else(|| Error::Unauthorized("missing_authorization".into()))?
        .to_string();
    let actor = resolve(&state, &token).await?;
    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}

/// Like [`authenticate`] but lets anonymous requests through. A token that is sent must still be valid.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    if let Some(token) = bearer_token(req.headers())?.map(str::to_string) {
        let actor = resolve(&state, &token).await?;
        req.extensions_mut().insert(actor);
    }
    Ok(next.run(req).await)
}

/// Must run after [`authenticate`].
pub async fn require_staff(req: Request, next: Next) -> Result<Response> {
    let actor = req
        .extensions()
        .get::<Actor>()
        .ok_or_else(|| Error::Unauthorized("missing_authorization".into()))?;
    actor.require_staff()?;
    Ok(next.run(req).await)
}

/// The authenticated caller.
pub struct CurrentActor(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .map(CurrentActor)
            .ok_or_else(|| Error::Unauthorized("missing_authorization".into()))
    }
}

/// The caller when a token was supplied, otherwise `None`.
pub struct MaybeActor(pub Option<Actor>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeActor
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        Ok(MaybeActor(parts.extensions.get::<Actor>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).unwrap().is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).unwrap(), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert!(matches!(bearer_token(&headers), Err(Error::Unauthorized(_))));
    }
}
