use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::upload_url;
use crate::models::application::{
    ApplicationListing, InterviewListing, InterviewStatus, InterviewType, StatusLogEntry,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateApplicationPayload {
    pub job_id: i64,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub cover_letter: String,
    pub expected_salary: Option<Decimal>,
    /// One of the caller's uploaded resumes; defaults to the one flagged default.
    pub resume_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateApplicationPayload {
    pub status: Option<String>,
    #[validate(length(max = 5000))]
    pub hr_notes: Option<String>,
    #[validate(length(max = 2000))]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct RejectPayload {
    #[validate(length(max = 2000))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApplicationListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
    pub job_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub id: i64,
    pub job_id: i64,
    pub job_title: String,
    pub company_id: i64,
    pub company_name: String,
    pub applicant_id: i64,
    pub applicant_user_id: i64,
    pub applicant_name: String,
    pub applicant_phone: String,
    pub applicant_school: String,
    pub applicant_major: String,
    pub cover_letter: String,
    pub resume: Option<String>,
    pub expected_salary: Option<Decimal>,
    pub status: String,
    pub hr_notes: String,
    pub rejection_reason: String,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl From<ApplicationListing> for ApplicationResponse {
    fn from(value: ApplicationListing) -> Self {
        let app = value.application;
        Self {
            id: app.id,
            job_id: app.job_id,
            job_title: value.job_title,
            company_id: value.company_id,
            company_name: value.company_name,
            applicant_id: app.applicant_id,
            applicant_user_id: value.applicant_user_id,
            applicant_name: value.applicant_name,
            applicant_phone: value.applicant_phone,
            applicant_school: value.applicant_school,
            applicant_major: value.applicant_major,
            cover_letter: app.cover_letter,
            resume: app.resume.as_deref().map(upload_url),
            expected_salary: app.expected_salary,
            status: app.status,
            hr_notes: app.hr_notes,
            rejection_reason: app.rejection_reason,
            applied_at: app.applied_at,
            updated_at: app.updated_at,
            reviewed_at: app.reviewed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusLogResponse {
    pub id: i64,
    pub old_status: String,
    pub new_status: String,
    pub changed_by: i64,
    pub changed_by_name: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl From<StatusLogEntry> for StatusLogResponse {
    fn from(value: StatusLogEntry) -> Self {
        Self {
            id: value.log.id,
            old_status: value.log.old_status,
            new_status: value.log.new_status,
            changed_by: value.log.changed_by,
            changed_by_name: value.changed_by_name,
            reason: value.log.reason,
            created_at: value.log.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScheduleInterviewPayload {
    pub interview_type: InterviewType,
    pub scheduled_time: DateTime<Utc>,
    #[validate(range(min = 5, max = 600, message = "Duration must be between 5 and 600 minutes"))]
    pub duration: Option<i32>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub location: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateInterviewPayload {
    pub status: Option<InterviewStatus>,
    pub scheduled_time: Option<DateTime<Utc>>,
    #[validate(range(min = 5, max = 600))]
    pub duration: Option<i32>,
    #[validate(length(max = 500))]
    pub location: Option<String>,
    #[validate(range(min = 0, max = 100, message = "Score must be between 0 and 100"))]
    pub score: Option<i32>,
    pub feedback: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewResponse {
    pub id: i64,
    pub application_id: i64,
    pub job_id: i64,
    pub job_title: String,
    pub company_name: String,
    pub applicant_name: String,
    pub interviewer_id: i64,
    pub interviewer_name: String,
    pub interview_type: String,
    pub scheduled_time: DateTime<Utc>,
    pub duration: i32,
    pub location: String,
    pub status: String,
    pub score: Option<i32>,
    pub feedback: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InterviewListing> for InterviewResponse {
    fn from(value: InterviewListing) -> Self {
        let iv = value.interview;
        Self {
            id: iv.id,
            application_id: iv.application_id,
            job_id: value.job_id,
            job_title: value.job_title,
            company_name: value.company_name,
            applicant_name: value.applicant_name,
            interviewer_id: iv.interviewer_id,
            interviewer_name: value.interviewer_name,
            interview_type: iv.interview_type,
            scheduled_time: iv.scheduled_time,
            duration: iv.duration,
            location: iv.location,
            status: iv.status,
            score: iv.score,
            feedback: iv.feedback,
            notes: iv.notes,
            created_at: iv.created_at,
            updated_at: iv.updated_at,
        }
    }
}
