use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    dto::{
        feedback_dto::{
            CountResponse, CreateFeedbackPayload, FeedbackCategoryResponse,
            FeedbackDetailResponse, FeedbackReplyResponse, FeedbackSummaryResponse,
            MarkReadPayload, MarkReadResponse, NotificationResponse, ReplyPayload,
        },
        ListResponse,
    },
    extract::Json,
    error::Result,
    middleware::auth::CurrentActor,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/feedback/categories",
    responses(
        (status = 200, description = "Active feedback categories", body = Json<ListResponse<FeedbackCategoryResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn categories(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let rows = state.feedback_service.categories().await?;
    let results: Vec<FeedbackCategoryResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(ListResponse::new(results)))
}

#[utoipa::path(
    get,
    path = "/api/feedback",
    responses(
        (status = 200, description = "Caller's feedback, newest first", body = Json<ListResponse<FeedbackSummaryResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn my_feedback(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse> {
    let rows = state.feedback_service.mine(&actor).await?;
    let results: Vec<FeedbackSummaryResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(ListResponse::new(results)))
}

#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = CreateFeedbackPayload,
    responses(
        (status = 201, description = "Feedback submitted", body = Json<FeedbackDetailResponse>),
        (status = 400, description = "Invalid payload or inactive category")
    )
)]
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<CreateFeedbackPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let feedback = state.feedback_service.submit(&actor, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(FeedbackDetailResponse::new(feedback, Vec::new())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/feedback/{id}",
    params(
        ("id" = i64, Path, description = "Feedback ID")
    ),
    responses(
        (status = 200, description = "Feedback with its replies", body = Json<FeedbackDetailResponse>),
        (status = 404, description = "Feedback not found")
    )
)]
#[axum::debug_handler]
pub async fn detail(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let (feedback, replies) = state.feedback_service.detail(&actor, id).await?;
    Ok(Json(FeedbackDetailResponse::new(feedback, replies)))
}

#[utoipa::path(
    post,
    path = "/api/feedback/{id}/reply",
    params(
        ("id" = i64, Path, description = "Feedback ID")
    ),
    request_body = ReplyPayload,
    responses(
        (status = 201, description = "Reply added", body = Json<FeedbackReplyResponse>),
        (status = 400, description = "Empty reply"),
        (status = 403, description = "Not the caller's feedback")
    )
)]
#[axum::debug_handler]
pub async fn reply(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<ReplyPayload>,
) -> Result<impl IntoResponse> {
    let reply = state
        .feedback_service
        .reply(&actor, id, payload.content, payload.attachments)
        .await?;
    Ok((StatusCode::CREATED, Json(FeedbackReplyResponse::from(reply))))
}

#[utoipa::path(
    get,
    path = "/api/feedback/notifications",
    responses(
        (status = 200, description = "Caller's notifications, newest first", body = Json<ListResponse<NotificationResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn notifications(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse> {
    let rows = state.notification_service.list(actor.id()).await?;
    let results: Vec<NotificationResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(ListResponse::new(results)))
}

#[utoipa::path(
    get,
    path = "/api/feedback/notifications/unread-count",
    responses(
        (status = 200, description = "Unread notification count", body = Json<CountResponse>)
    )
)]
#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse> {
    let count = state.notification_service.unread_count(actor.id()).await?;
    Ok(Json(CountResponse { count }))
}

#[utoipa::path(
    post,
    path = "/api/feedback/notifications/{id}/read",
    params(
        ("id" = i64, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked read", body = Json<NotificationResponse>),
        (status = 404, description = "Notification not found")
    )
)]
#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let notification = state.notification_service.mark_read(actor.id(), id).await?;
    Ok(Json(NotificationResponse::from(notification)))
}

/// Without ids every unread notification of the caller is marked.
#[utoipa::path(
    post,
    path = "/api/feedback/notifications/mark-read",
    request_body = MarkReadPayload,
    responses(
        (status = 200, description = "Notifications marked read", body = Json<MarkReadResponse>)
    )
)]
#[axum::debug_handler]
pub async fn mark_all_read(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    payload: Option<Json<MarkReadPayload>>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.unwrap_or_default();
    let count = state
        .notification_service
        .mark_all_read(actor.id(), payload.notification_ids.as_deref())
        .await?;
    Ok(Json(MarkReadResponse {
        message: format!("Marked {} notifications as read", count),
        count,
    }))
}
