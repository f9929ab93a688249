use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{dto::admin_dto::PublicStatsResponse, error::Result, AppState};

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service and database are reachable"),
        (status = 503, description = "Database unavailable")
    )
)]
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/stats/dashboard",
    responses(
        (status = 200, description = "Public platform counters", body = Json<PublicStatsResponse>)
    )
)]
#[axum::debug_handler]
pub async fn public_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.stats_service.public().await?;
    Ok(Json(stats))
}
