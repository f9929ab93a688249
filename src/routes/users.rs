use std::path::PathBuf;

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;
use validator::Validate;

use crate::{
    config::get_config,
    dto::{
        user_dto::{
            EnterpriseProfilePayload, EnterpriseProfileResponse, JobIntentionPayload,
            JobIntentionResponse, ProfileListQuery, ProfileResponse, ResumeResponse,
            RoleResponse, StudentProfileResponse, UpdateStudentProfilePayload, UpdateUserPayload,
            UserResponse,
        },
        ListResponse, Page,
    },
    extract::{Json, Query},
    error::{Error, Result},
    middleware::auth::CurrentActor,
    utils::upload::{Upload, UploadKind},
    AppState,
};

fn content_type_for(file_type: &str) -> &'static str {
    match file_type {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user with profiles", body = Json<ProfileResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse> {
    let profile = state.user_service.profile(&actor).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    patch,
    path = "/api/users/me",
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Account updated", body = Json<UserResponse>),
        (status = 400, description = "Invalid payload or email in use")
    )
)]
#[axum::debug_handler]
pub async fn update_me(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_service.update_user(&actor, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/users/me/avatar",
    responses(
        (status = 200, description = "Avatar stored", body = Json<UserResponse>),
        (status = 400, description = "Missing file, wrong type or too large")
    )
)]
#[axum::debug_handler]
pub async fn upload_avatar(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut upload: Option<Upload> = None;
    while let Some(field) = multipart.next_field().await.map_err(Error::Multipart)? {
        if field.name() == Some("avatar") {
            let filename = field.file_name().unwrap_or("avatar").to_string();
            let data = field.bytes().await.map_err(Error::Multipart)?;
            upload = Some(Upload::new(UploadKind::Avatar, &filename, data)?);
        }
    }
    let upload = upload.ok_or_else(|| Error::BadRequest("No avatar file provided".into()))?;
    let user = state.user_service.upload_avatar(&actor, upload).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/me/job-intention",
    responses(
        (status = 200, description = "Job intention", body = Json<JobIntentionResponse>),
        (status = 404, description = "No job intention recorded")
    )
)]
#[axum::debug_handler]
pub async fn get_job_intention(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse> {
    let intention = state.user_service.job_intention(&actor).await?;
    Ok(Json(JobIntentionResponse::from(intention)))
}

#[utoipa::path(
    put,
    path = "/api/users/me/job-intention",
    request_body = JobIntentionPayload,
    responses(
        (status = 200, description = "Job intention saved", body = Json<JobIntentionResponse>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn put_job_intention(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<JobIntentionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let intention = state.user_service.put_job_intention(&actor, payload).await?;
    Ok(Json(JobIntentionResponse::from(intention)))
}

#[utoipa::path(
    get,
    path = "/api/users/me/resumes",
    responses(
        (status = 200, description = "Caller's resumes", body = Json<ListResponse<ResumeResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn list_resumes(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse> {
    let resumes = state.user_service.list_resumes(&actor).await?;
    let results: Vec<ResumeResponse> = resumes.into_iter().map(Into::into).collect();
    Ok(Json(ListResponse::new(results)))
}

#[utoipa::path(
    post,
    path = "/api/users/me/resumes",
    responses(
        (status = 201, description = "Resume uploaded", body = Json<ResumeResponse>),
        (status = 400, description = "Missing file, wrong type or too large")
    )
)]
#[axum::debug_handler]
pub async fn upload_resume(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut upload: Option<Upload> = None;
    let mut name: Option<String> = None;
    let mut is_default = false;

    while let Some(field) = multipart.next_field().await.map_err(Error::Multipart)? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let data = field.bytes().await.map_err(Error::Multipart)?;
                upload = Some(Upload::new(UploadKind::Resume, &filename, data)?);
            }
            "name" => {
                name = Some(field.text().await.map_err(Error::Multipart)?);
            }
            "is_default" => {
                is_default = parse_flag(&field.text().await.map_err(Error::Multipart)?);
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| Error::BadRequest("No resume file provided".into()))?;
    let resume = state
        .user_service
        .upload_resume(&actor, name, is_default, upload)
        .await?;
    Ok((StatusCode::CREATED, Json(ResumeResponse::from(resume))))
}

/// Streams the stored file back as an attachment.
#[utoipa::path(
    get,
    path = "/api/users/me/resumes/{id}",
    params(
        ("id" = i64, Path, description = "Resume ID")
    ),
    responses(
        (status = 200, description = "Resume file"),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn download_resume(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<Response> {
    let resume = state.user_service.get_resume(&actor, id).await?;
    let path = PathBuf::from(&get_config().uploads_dir).join(&resume.file);
    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound("Resume file is missing".into())
        } else {
            Error::Io(e)
        }
    })?;

    let disposition = format!(
        "attachment; filename=\"{}.{}\"",
        resume.name.replace('"', ""),
        resume.file_type
    );
    Ok((
        [
            (CONTENT_TYPE, content_type_for(&resume.file_type).to_string()),
            (CONTENT_LENGTH, resume.file_size.to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/users/me/resumes/{id}",
    params(
        ("id" = i64, Path, description = "Resume ID")
    ),
    responses(
        (status = 204, description = "Resume deleted"),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_resume(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.user_service.delete_resume(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/users/student-profiles",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Visible student profiles")
    )
)]
#[axum::debug_handler]
pub async fn list_student_profiles(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ProfileListQuery>,
) -> Result<impl IntoResponse> {
    let page = Page::new(query.page, query.page_size);
    let profiles = state
        .user_service
        .list_student_profiles(&actor, page)
        .await?;
    Ok(Json(profiles.map(StudentProfileResponse::from)))
}

#[utoipa::path(
    patch,
    path = "/api/users/student-profiles/me",
    request_body = UpdateStudentProfilePayload,
    responses(
        (status = 200, description = "Student profile saved", body = Json<StudentProfileResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller is not a student")
    )
)]
#[axum::debug_handler]
pub async fn update_student_profile(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<UpdateStudentProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let profile = state
        .user_service
        .update_student_profile(&actor, payload)
        .await?;
    Ok(Json(StudentProfileResponse::from(profile)))
}

#[utoipa::path(
    get,
    path = "/api/users/enterprise-profiles",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Visible enterprise profiles")
    )
)]
#[axum::debug_handler]
pub async fn list_enterprise_profiles(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ProfileListQuery>,
) -> Result<impl IntoResponse> {
    let page = Page::new(query.page, query.page_size);
    let profiles = state
        .user_service
        .list_enterprise_profiles(&actor, page)
        .await?;
    Ok(Json(profiles.map(EnterpriseProfileResponse::from)))
}

#[utoipa::path(
    put,
    path = "/api/users/enterprise-profiles/me",
    request_body = EnterpriseProfilePayload,
    responses(
        (status = 200, description = "Enterprise profile saved", body = Json<EnterpriseProfileResponse>),
        (status = 400, description = "Invalid payload or company code taken"),
        (status = 403, description = "Caller is not an enterprise user")
    )
)]
#[axum::debug_handler]
pub async fn upsert_enterprise_profile(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<EnterpriseProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let profile = state
        .user_service
        .upsert_enterprise_profile(&actor, payload)
        .await?;
    Ok(Json(EnterpriseProfileResponse::from(profile)))
}

#[utoipa::path(
    get,
    path = "/api/users/roles",
    responses(
        (status = 200, description = "All roles", body = Json<ListResponse<RoleResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn list_roles(
    State(state): State<AppState>,
    CurrentActor(_actor): CurrentActor,
) -> Result<impl IntoResponse> {
    let roles = state.user_service.list_roles().await?;
    let results: Vec<RoleResponse> = roles.into_iter().map(Into::into).collect();
    Ok(Json(ListResponse::new(results)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_flags() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("ON"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn resume_content_types() {
        assert_eq!(content_type_for("pdf"), "application/pdf");
        assert_eq!(content_type_for("exe"), "application/octet-stream");
    }
}
