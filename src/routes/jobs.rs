use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    dto::{
        job_dto::{
            CreateJobPayload, FavoriteResponse, JobCategoryResponse, JobDetailResponse,
            JobListQuery, JobResponse, JobSummaryResponse, LimitQuery, UpdateJobPayload,
        },
        ListResponse, MessageResponse,
    },
    extract::{Json, Query},
    error::Result,
    middleware::auth::{CurrentActor, MaybeActor},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Status filter, staff only beyond published"),
        ("job_type" = Option<String>, Query, description = "Job type"),
        ("work_city" = Option<String>, Query, description = "City substring"),
        ("category" = Option<i64>, Query, description = "Category ID"),
        ("company" = Option<i64>, Query, description = "Company ID"),
        ("search" = Option<String>, Query, description = "Matches title, description or company name"),
        ("salary_min" = Option<f64>, Query, description = "Lower salary bound"),
        ("salary_max" = Option<f64>, Query, description = "Upper salary bound"),
        ("experience" = Option<String>, Query, description = "Experience substring"),
        ("skills" = Option<String>, Query, description = "Comma separated skills"),
        ("ordering" = Option<String>, Query, description = "Sort key, prefix with - for descending")
    ),
    responses(
        (status = 200, description = "Paginated jobs")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    MaybeActor(viewer): MaybeActor,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list(viewer.as_ref(), query).await?;
    Ok(Json(jobs.map(JobSummaryResponse::from)))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created", body = Json<JobResponse>),
        (status = 400, description = "Invalid payload or caller has no company")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

#[utoipa::path(
    get,
    path = "/api/jobs/categories",
    responses(
        (status = 200, description = "Active job categories", body = Json<ListResponse<JobCategoryResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn categories(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let rows = state.job_service.categories().await?;
    let results: Vec<JobCategoryResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(ListResponse::new(results)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/latest",
    params(
        ("limit" = Option<i64>, Query, description = "How many jobs to return")
    ),
    responses(
        (status = 200, description = "Most recently published jobs")
    )
)]
#[axum::debug_handler]
pub async fn latest_jobs(
    State(state): State<AppState>,
    MaybeActor(viewer): MaybeActor,
    Query(query): Query<LimitQuery>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.latest(viewer.as_ref(), query.limit).await?;
    let results: Vec<JobSummaryResponse> = jobs.into_iter().map(Into::into).collect();
    Ok(Json(ListResponse::new(results)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/hot",
    params(
        ("limit" = Option<i64>, Query, description = "How many jobs to return")
    ),
    responses(
        (status = 200, description = "Most viewed published jobs")
    )
)]
#[axum::debug_handler]
pub async fn hot_jobs(
    State(state): State<AppState>,
    MaybeActor(viewer): MaybeActor,
    Query(query): Query<LimitQuery>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.hot(viewer.as_ref(), query.limit).await?;
    let results: Vec<JobSummaryResponse> = jobs.into_iter().map(Into::into).collect();
    Ok(Json(ListResponse::new(results)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/favorites",
    responses(
        (status = 200, description = "Caller's favorite jobs", body = Json<ListResponse<FavoriteResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn favorites(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse> {
    let rows = state.job_service.favorites(&actor).await?;
    let results: Vec<FavoriteResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(ListResponse::new(results)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/enterprise",
    responses(
        (status = 200, description = "Every job of the caller's company")
    )
)]
#[axum::debug_handler]
pub async fn enterprise_jobs(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.enterprise_jobs(&actor).await?;
    let results: Vec<JobSummaryResponse> = jobs.into_iter().map(Into::into).collect();
    Ok(Json(ListResponse::new(results)))
}

/// Counts as a view.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job detail", body = Json<JobDetailResponse>),
        (status = 404, description = "Job not found or not visible")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    MaybeActor(viewer): MaybeActor,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let listing = state.job_service.view(viewer.as_ref(), id).await?;
    Ok(Json(JobDetailResponse::from(listing)))
}

#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = Json<JobResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(&actor, id, payload).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/favorite",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 201, description = "Job favorited", body = Json<MessageResponse>),
        (status = 200, description = "Job was already a favorite", body = Json<MessageResponse>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn favorite_job(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    if state.job_service.favorite(&actor, id).await? {
        Ok((StatusCode::CREATED, Json(MessageResponse::new("Job favorited"))))
    } else {
        Ok((StatusCode::OK, Json(MessageResponse::new("Job already favorited"))))
    }
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}/favorite",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Favorite removed", body = Json<MessageResponse>),
        (status = 404, description = "Job is not a favorite")
    )
)]
#[axum::debug_handler]
pub async fn unfavorite_job(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.job_service.unfavorite(&actor, id).await?;
    Ok(Json(MessageResponse::new("Job removed from favorites")))
}
