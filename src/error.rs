use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Map, Value as JsonValue};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Request body rejected: {0}")]
    JsonBody(#[from] JsonRejection),

    #[error("Query string rejected: {0}")]
    QueryString(#[from] QueryRejection),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_)
            | Error::InvalidStatus(_)
            | Error::Conflict(_)
            | Error::Validation(_)
            | Error::Json(_)
            | Error::Multipart(_)
            | Error::JsonBody(_)
            | Error::QueryString(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) | Error::Token(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Config(_)
            | Error::Database(_)
            | Error::Migrate(_)
            | Error::Anyhow(_)
            | Error::Internal(_)
            | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A lone field error is reported by its own message instead of the generic summary.
fn validation_summary(errors: &validator::ValidationErrors) -> String {
    let fields = errors.field_errors();
    if fields.len() == 1 {
        if let Some(errs) = fields.values().next() {
            if let [only] = errs.as_slice() {
                if let Some(message) = &only.message {
                    return message.to_string();
                }
            }
        }
    }
    "Validation failed".to_string()
}

/// Duplicate-key failures; the constraint text stays in the log.
fn unique_violation(detail: &str) -> Error {
    tracing::warn!(detail, "unique constraint violated");
    Error::Conflict("Resource already exists".to_string())
}

/// Flattens validator output into `{field: [message, ...]}`.
fn field_errors(errors: &validator::ValidationErrors) -> JsonValue {
    let mut fields = Map::new();
    for (field, errs) in errors.field_errors() {
        let messages: Vec<JsonValue> = errs
            .iter()
            .map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                JsonValue::String(message)
            })
            .collect();
        fields.insert(field.to_string(), JsonValue::Array(messages));
    }
    JsonValue::Object(fields)
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = match &self {
            Error::Validation(errs) => json!({
                "error": validation_summary(errs),
                "fields": field_errors(errs),
            }),
            Error::BadRequest(msg)
            | Error::InvalidStatus(msg)
            | Error::Conflict(msg)
            | Error::Unauthorized(msg)
            | Error::Forbidden(msg)
            | Error::NotFound(msg) => json!({ "error": msg }),
            Error::Json(err) => json!({ "error": err.to_string() }),
            Error::Multipart(err) => json!({ "error": err.to_string() }),
            Error::JsonBody(rejection) => json!({ "error": rejection.body_text() }),
            Error::QueryString(rejection) => json!({ "error": rejection.body_text() }),
            Error::Token(_) => json!({ "error": "invalid_token" }),
            other => {
                tracing::error!(error = ?other, "request failed");
                json!({ "error": "An unexpected error occurred" })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                unique_violation(db.message())
            }
            other => Error::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "title is required"))]
        title: String,
    }

    #[test]
    fn status_codes_follow_error_taxonomy() {
        assert_eq!(
            Error::Conflict("dup".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InvalidStatus("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Forbidden("no".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            Error::Unauthorized("no".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn single_field_error_surfaces_its_message() {
        let err = crate::utils::validation::field_error(
            "job_id",
            "job_not_open",
            "Job is not open for applications",
        );
        let Error::Validation(errs) = &err else {
            panic!("expected a validation error");
        };
        assert_eq!(validation_summary(errs), "Job is not open for applications");
    }

    #[test]
    fn several_field_errors_keep_the_summary() {
        #[derive(Validate)]
        struct Pair {
            #[validate(length(min = 1, message = "title is required"))]
            title: String,
            #[validate(length(min = 1, message = "body is required"))]
            body: String,
        }
        let errs = Pair {
            title: String::new(),
            body: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(validation_summary(&errs), "Validation failed");
    }

    #[test]
    fn unique_violation_hides_constraint_names() {
        let err = unique_violation("duplicate key value violates unique constraint \"users_phone_key\"");
        match err {
            Error::Conflict(msg) => {
                assert_eq!(msg, "Resource already exists");
                assert!(!msg.contains("users_phone_key"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn validation_errors_are_keyed_by_field() {
        let payload = Payload {
            title: String::new(),
        };
        let errs = payload.validate().unwrap_err();
        let fields = field_errors(&errs);
        assert_eq!(fields["title"][0], "title is required");
    }
}
