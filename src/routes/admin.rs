use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    config::get_config,
    dto::{
        admin_dto::{
            AdminFeedbackQuery, AdminJobQuery, AdminReplyPayload, AdminUserQuery,
            DashboardStatsResponse, JobApplicantResponse, ResetPasswordPayload, StatusPayload,
            SystemSettingsPayload, SystemSettingsResponse, ToggleStatusResponse,
        },
        feedback_dto::{FeedbackDetailResponse, FeedbackSummaryResponse},
        job_dto::{JobResponse, JobSummaryResponse},
        user_dto::UserResponse,
        ListResponse, MessageResponse,
    },
    extract::{Json, Query},
    error::Result,
    middleware::auth::CurrentActor,
    utils::upload::UploadKind,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/stats",
    responses(
        (status = 200, description = "Platform counters and registration trend", body = Json<DashboardStatsResponse>),
        (status = 403, description = "Caller is not staff")
    )
)]
#[axum::debug_handler]
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.stats_service.dashboard().await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page"),
        ("search" = Option<String>, Query, description = "Matches name, phone or email"),
        ("user_type" = Option<String>, Query, description = "student, enterprise or admin"),
        ("is_active" = Option<bool>, Query, description = "Account state")
    ),
    responses(
        (status = 200, description = "Paginated users")
    )
)]
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<AdminUserQuery>,
) -> Result<impl IntoResponse> {
    let users = state.user_service.admin_list_users(query).await?;
    Ok(Json(users.map(UserResponse::from)))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/toggle-status",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Account enabled or disabled", body = Json<ToggleStatusResponse>),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn toggle_user_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.toggle_active(id).await?;
    let message = if user.is_active {
        "User enabled"
    } else {
        "User disabled"
    };
    Ok(Json(ToggleStatusResponse {
        message: message.to_string(),
        is_active: user.is_active,
    }))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/reset-password",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Password reset", body = Json<MessageResponse>),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Option<Json<ResetPasswordPayload>>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.unwrap_or_default();
    payload.validate()?;
    state
        .user_service
        .reset_password(id, payload.new_password.as_deref())
        .await?;
    Ok(Json(MessageResponse::new("Password has been reset")))
}

#[utoipa::path(
    get,
    path = "/api/admin/jobs",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Job status"),
        ("search" = Option<String>, Query, description = "Matches title, company or city")
    ),
    responses(
        (status = 200, description = "Paginated jobs in every status")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<AdminJobQuery>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.admin_list(query).await?;
    Ok(Json(jobs.map(JobSummaryResponse::from)))
}

#[utoipa::path(
    post,
    path = "/api/admin/jobs/{id}/status",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    request_body = StatusPayload,
    responses(
        (status = 200, description = "Status changed", body = Json<JobResponse>),
        (status = 400, description = "Status not settable"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn change_job_status(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<StatusPayload>,
) -> Result<impl IntoResponse> {
    let job = state
        .job_service
        .change_status(&actor, id, &payload.status)
        .await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    get,
    path = "/api/admin/jobs/{id}/applications",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Applicants of the job", body = Json<ListResponse<JobApplicantResponse>>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn job_applications(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.job_service.get_job(id).await?;
    let rows = state.application_service.for_job(id).await?;
    let results: Vec<JobApplicantResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(ListResponse::new(results)))
}

#[utoipa::path(
    get,
    path = "/api/admin/feedbacks",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Feedback status"),
        ("category" = Option<i64>, Query, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Paginated feedback")
    )
)]
#[axum::debug_handler]
pub async fn list_feedbacks(
    State(state): State<AppState>,
    Query(query): Query<AdminFeedbackQuery>,
) -> Result<impl IntoResponse> {
    let rows = state.feedback_service.admin_list(query).await?;
    Ok(Json(rows.map(FeedbackSummaryResponse::from)))
}

#[utoipa::path(
    post,
    path = "/api/admin/feedbacks/{id}/reply",
    params(
        ("id" = i64, Path, description = "Feedback ID")
    ),
    request_body = AdminReplyPayload,
    responses(
        (status = 200, description = "Reply stored and feedback resolved", body = Json<FeedbackDetailResponse>),
        (status = 400, description = "Empty reply"),
        (status = 404, description = "Feedback not found")
    )
)]
#[axum::debug_handler]
pub async fn reply_feedback(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<AdminReplyPayload>,
) -> Result<impl IntoResponse> {
    let feedback = state
        .feedback_service
        .admin_reply(&actor, id, payload.reply)
        .await?;
    let replies = state.feedback_service.replies(id).await?;
    Ok(Json(FeedbackDetailResponse::new(feedback, replies)))
}

#[utoipa::path(
    post,
    path = "/api/admin/feedbacks/{id}/status",
    params(
        ("id" = i64, Path, description = "Feedback ID")
    ),
    request_body = StatusPayload,
    responses(
        (status = 200, description = "Status changed", body = Json<FeedbackDetailResponse>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Feedback not found")
    )
)]
#[axum::debug_handler]
pub async fn change_feedback_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusPayload>,
) -> Result<impl IntoResponse> {
    let feedback = state
        .feedback_service
        .admin_change_status(id, &payload.status)
        .await?;
    let replies = state.feedback_service.replies(id).await?;
    Ok(Json(FeedbackDetailResponse::new(feedback, replies)))
}

fn current_settings() -> SystemSettingsResponse {
    let config = get_config();
    SystemSettingsResponse {
        platform_name: config.platform.platform_name.clone(),
        contact_email: config.platform.contact_email.clone(),
        service_phone: config.platform.service_phone.clone(),
        allow_register: true,
        email_notification: false,
        max_upload_size: UploadKind::Resume.max_bytes() as i64,
        session_timeout: config.jwt_access_ttl_minutes * 60,
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/system/settings",
    responses(
        (status = 200, description = "Configured platform settings", body = Json<SystemSettingsResponse>)
    )
)]
#[axum::debug_handler]
pub async fn get_settings() -> Result<impl IntoResponse> {
    Ok(Json(current_settings()))
}

/// Settings come from the environment; a valid submission is acknowledged, not stored.
#[utoipa::path(
    post,
    path = "/api/admin/system/settings",
    request_body = SystemSettingsPayload,
    responses(
        (status = 200, description = "Settings accepted", body = Json<MessageResponse>),
        (status = 400, description = "Required setting missing")
    )
)]
#[axum::debug_handler]
pub async fn update_settings(
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<SystemSettingsPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    tracing::info!(
        admin_id = actor.id(),
        platform_name = %payload.platform_name,
        "system settings submitted"
    );
    Ok(Json(MessageResponse::new("Settings saved")))
}
