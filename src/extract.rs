//! `Json` and `Query` extractors whose rejections render through [`Error`], so a
//! malformed body or query string gets the same JSON error shape as everything else.

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct Query<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use serde::Deserialize;
    use serde_json::Value as JsonValue;
    use tower::ServiceExt;

    #[derive(Deserialize, Serialize)]
    struct Echo {
        value: i64,
    }

    async fn echo_body(Json(echo): Json<Echo>) -> Json<Echo> {
        Json(echo)
    }

    async fn echo_query(Query(echo): Query<Echo>) -> Json<Echo> {
        Json(echo)
    }

    fn app() -> Router {
        Router::new()
            .route("/body", post(echo_body))
            .route("/query", get(echo_query))
    }

    async fn call(req: Request<Body>) -> (StatusCode, Option<String>, JsonValue) {
        let res = app().oneshot(req).await.unwrap();
        let status = res.status();
        let content_type = res
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        (status, content_type, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn malformed_body_is_a_json_bad_request() {
        let req = Request::post("/body")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, content_type, body) = call(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert!(body["error"].as_str().unwrap().contains("JSON"));
    }

    #[tokio::test]
    async fn missing_content_type_is_a_json_error() {
        let req = Request::post("/body").body(Body::from(r#"{"value":1}"#)).unwrap();
        let (status, _, body) = call(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn bad_query_is_a_json_bad_request() {
        let req = Request::get("/query?value=abc").body(Body::empty()).unwrap();
        let (status, _, body) = call(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn well_formed_input_round_trips() {
        let req = Request::get("/query?value=7").body(Body::empty()).unwrap();
        let (status, _, body) = call(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["value"], 7);
    }
}
