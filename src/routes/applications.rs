use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    dto::{
        application_dto::{
            ApplicationListQuery, ApplicationResponse, CreateApplicationPayload,
            InterviewResponse, RejectPayload, ScheduleInterviewPayload, StatusLogResponse,
            UpdateApplicationPayload, UpdateInterviewPayload,
        },
        ListResponse, MessageResponse,
    },
    extract::{Json, Query},
    error::Result,
    middleware::auth::CurrentActor,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/applications",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Application status"),
        ("job_id" = Option<i64>, Query, description = "Restrict to one job")
    ),
    responses(
        (status = 200, description = "Applications visible to the caller")
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let rows = state.application_service.list(&actor, query).await?;
    Ok(Json(rows.map(ApplicationResponse::from)))
}

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = CreateApplicationPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<ApplicationResponse>),
        (status = 400, description = "Job closed, duplicate application or missing profile"),
        (status = 403, description = "Caller is not a student")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let listing = state.application_service.apply(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(ApplicationResponse::from(listing))))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application detail", body = Json<ApplicationResponse>),
        (status = 404, description = "Not found or not visible")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let listing = state.application_service.get(&actor, id).await?;
    Ok(Json(ApplicationResponse::from(listing)))
}

#[utoipa::path(
    patch,
    path = "/api/applications/{id}",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationPayload,
    responses(
        (status = 200, description = "Application updated", body = Json<ApplicationResponse>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Application belongs to another company")
    )
)]
#[axum::debug_handler]
pub async fn update_application(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let listing = state.application_service.update(&actor, id, payload).await?;
    Ok(Json(ApplicationResponse::from(listing)))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/approve",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application accepted", body = Json<MessageResponse>),
        (status = 403, description = "Application belongs to another company")
    )
)]
#[axum::debug_handler]
pub async fn approve(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.application_service.approve(&actor, id).await?;
    Ok(Json(MessageResponse::new("Application approved")))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/reject",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    request_body = RejectPayload,
    responses(
        (status = 200, description = "Application rejected", body = Json<MessageResponse>),
        (status = 403, description = "Application belongs to another company")
    )
)]
#[axum::debug_handler]
pub async fn reject(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    payload: Option<Json<RejectPayload>>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.unwrap_or_default();
    payload.validate()?;
    state
        .application_service
        .reject(&actor, id, payload.reason)
        .await?;
    Ok(Json(MessageResponse::new("Application rejected")))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/withdraw",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application withdrawn", body = Json<MessageResponse>),
        (status = 403, description = "Not the caller's application")
    )
)]
#[axum::debug_handler]
pub async fn withdraw(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.application_service.withdraw(&actor, id).await?;
    Ok(Json(MessageResponse::new("Application withdrawn")))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}/logs",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Status history, newest first", body = Json<ListResponse<StatusLogResponse>>),
        (status = 404, description = "Not found or not visible")
    )
)]
#[axum::debug_handler]
pub async fn status_logs(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let logs = state.application_service.status_logs(&actor, id).await?;
    let results: Vec<StatusLogResponse> = logs.into_iter().map(Into::into).collect();
    Ok(Json(ListResponse::new(results)))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/interviews",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    request_body = ScheduleInterviewPayload,
    responses(
        (status = 201, description = "Interview scheduled", body = Json<InterviewResponse>),
        (status = 403, description = "Application belongs to another company")
    )
)]
#[axum::debug_handler]
pub async fn schedule_interview(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<ScheduleInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .application_service
        .schedule_interview(&actor, id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(InterviewResponse::from(interview))))
}

#[utoipa::path(
    get,
    path = "/api/applications/interviews",
    responses(
        (status = 200, description = "Interviews visible to the caller", body = Json<ListResponse<InterviewResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse> {
    let rows = state.application_service.list_interviews(&actor).await?;
    let results: Vec<InterviewResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(ListResponse::new(results)))
}

#[utoipa::path(
    patch,
    path = "/api/applications/interviews/{id}",
    params(
        ("id" = i64, Path, description = "Interview ID")
    ),
    request_body = UpdateInterviewPayload,
    responses(
        (status = 200, description = "Interview updated", body = Json<InterviewResponse>),
        (status = 403, description = "Interview belongs to another company"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn update_interview(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .application_service
        .update_interview(&actor, id, payload)
        .await?;
    Ok(Json(InterviewResponse::from(interview)))
}
