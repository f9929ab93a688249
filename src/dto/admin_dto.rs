use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::application::ApplicationListing;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdminUserQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub user_type: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdminJobQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdminFeedbackQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
    pub category: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct ResetPasswordPayload {
    #[validate(length(min = 6, max = 128))]
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdminReplyPayload {
    pub reply: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleStatusResponse {
    pub message: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplicantResponse {
    pub id: i64,
    pub user_name: String,
    pub user_phone: String,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub cover_letter: String,
}

impl From<ApplicationListing> for JobApplicantResponse {
    fn from(value: ApplicationListing) -> Self {
        let user_name = if value.applicant_name.is_empty() {
            value.applicant_phone.clone()
        } else {
            value.applicant_name
        };
        Self {
            id: value.application.id,
            user_name,
            user_phone: value.applicant_phone,
            status: value.application.status,
            applied_at: value.application.applied_at,
            cover_letter: value.application.cover_letter,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSettingsResponse {
    pub platform_name: String,
    pub contact_email: String,
    pub service_phone: String,
    pub allow_register: bool,
    pub email_notification: bool,
    pub max_upload_size: i64,
    pub session_timeout: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SystemSettingsPayload {
    #[validate(length(min = 1, message = "platform_name cannot be empty"))]
    #[serde(default)]
    pub platform_name: String,
    #[validate(length(min = 1, message = "contact_email cannot be empty"))]
    #[serde(default)]
    pub contact_email: String,
    #[validate(length(min = 1, message = "service_phone cannot be empty"))]
    #[serde(default)]
    pub service_phone: String,
    pub allow_register: Option<bool>,
    pub email_notification: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total: i64,
    pub students: i64,
    pub enterprises: i64,
    pub admins: i64,
    pub today_new: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStats {
    pub total: i64,
    pub active: i64,
    pub draft: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationStats {
    pub total: i64,
    pub pending: i64,
    pub accepted: i64,
    pub today_new: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackStats {
    pub total: i64,
    pub pending: i64,
    pub today_new: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trends {
    pub daily_registrations: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStatsResponse {
    pub user_stats: UserStats,
    pub job_stats: JobStats,
    pub application_stats: ApplicationStats,
    pub feedback_stats: FeedbackStats,
    pub trends: Trends,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStatsResponse {
    pub total_users: i64,
    pub total_jobs: i64,
    pub total_applications: i64,
    pub successful_placements: i64,
}
