use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::dto::upload_url;
use crate::models::job::JobType;
use crate::models::profile::{
    format_file_size, EnterpriseProfile, JobIntention, Resume, SalaryRange, StudentProfile,
};
use crate::models::user::{Gender, Role, User};
use crate::services::user_service::UserProfile;
use crate::utils::validation::{validate_gpa, validate_skill_list};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub permissions: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            permissions: value.permissions,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub phone: String,
    pub email: Option<String>,
    pub user_type: String,
    pub avatar: Option<String>,
    pub real_name: String,
    pub gender: String,
    pub birth_date: Option<NaiveDate>,
    pub address: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_verified: bool,
    pub last_login_ip: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            phone: value.phone,
            email: value.email,
            user_type: value.user_type,
            avatar: value.avatar.as_deref().map(upload_url),
            real_name: value.real_name,
            gender: value.gender,
            birth_date: value.birth_date,
            address: value.address,
            is_active: value.is_active,
            is_staff: value.is_staff,
            is_verified: value.is_verified,
            last_login_ip: value.last_login_ip.map(|ip| ip.ip().to_string()),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Compact user reference embedded in other payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBrief {
    pub id: i64,
    pub phone: String,
    pub real_name: String,
    pub user_type: String,
}

impl From<&User> for UserBrief {
    fn from(value: &User) -> Self {
        Self {
            id: value.id,
            phone: value.phone.clone(),
            real_name: value.real_name.clone(),
            user_type: value.user_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfileResponse {
    pub id: i64,
    pub user_id: i64,
    pub student_id: String,
    pub school: String,
    pub major: String,
    pub grade: String,
    pub graduation_date: Option<NaiveDate>,
    pub gpa: Option<Decimal>,
    pub resume: Option<String>,
    pub skills: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StudentProfile> for StudentProfileResponse {
    fn from(value: StudentProfile) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            student_id: value.student_id,
            school: value.school,
            major: value.major,
            grade: value.grade,
            graduation_date: value.graduation_date,
            gpa: value.gpa,
            resume: value.resume.as_deref().map(upload_url),
            skills: value.skills,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnterpriseProfileResponse {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub company_code: String,
    pub industry: String,
    pub company_size: String,
    pub company_address: String,
    pub company_website: String,
    pub company_description: String,
    pub business_license: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EnterpriseProfile> for EnterpriseProfileResponse {
    fn from(value: EnterpriseProfile) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            company_name: value.company_name,
            company_code: value.company_code,
            industry: value.industry,
            company_size: value.company_size,
            company_address: value.company_address,
            company_website: value.company_website,
            company_description: value.company_description,
            business_license: value.business_license.as_deref().map(upload_url),
            is_verified: value.is_verified,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobIntentionResponse {
    pub id: i64,
    pub position: String,
    pub salary_range: String,
    pub work_cities: JsonValue,
    pub job_type: String,
    pub industry: String,
    pub company_size: String,
    pub other_requirements: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<JobIntention> for JobIntentionResponse {
    fn from(value: JobIntention) -> Self {
        Self {
            id: value.id,
            position: value.position,
            salary_range: value.salary_range,
            work_cities: value.work_cities,
            job_type: value.job_type,
            industry: value.industry,
            company_size: value.company_size,
            other_requirements: value.other_requirements,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeResponse {
    pub id: i64,
    pub name: String,
    pub file: String,
    pub file_size: i64,
    pub file_size_display: String,
    pub file_type: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Resume> for ResumeResponse {
    fn from(value: Resume) -> Self {
        Self {
            id: value.id,
            name: value.name,
            file: upload_url(&value.file),
            file_size: value.file_size,
            file_size_display: format_file_size(value.file_size),
            file_type: value.file_type,
            is_default: value.is_default,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// `GET /api/users/me`: the account plus everything hanging off it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub roles: Vec<RoleResponse>,
    pub student_profile: Option<StudentProfileResponse>,
    pub enterprise_profile: Option<EnterpriseProfileResponse>,
    pub job_intention: Option<JobIntentionResponse>,
    pub resumes: Vec<ResumeResponse>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(value: UserProfile) -> Self {
        Self {
            user: value.user.into(),
            roles: value.roles.into_iter().map(Into::into).collect(),
            student_profile: value.student_profile.map(Into::into),
            enterprise_profile: value.enterprise_profile.map(Into::into),
            job_intention: value.job_intention.map(Into::into),
            resumes: value.resumes.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserPayload {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub real_name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStudentProfilePayload {
    #[validate(length(max = 20))]
    pub student_id: Option<String>,
    #[validate(length(max = 100))]
    pub school: Option<String>,
    #[validate(length(max = 100))]
    pub major: Option<String>,
    #[validate(length(max = 20))]
    pub grade: Option<String>,
    pub graduation_date: Option<NaiveDate>,
    #[validate(custom(function = "validate_gpa"))]
    pub gpa: Option<Decimal>,
    #[validate(custom(function = "validate_skill_list"))]
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EnterpriseProfilePayload {
    #[validate(length(min = 1, max = 200, message = "Company name is required"))]
    pub company_name: String,
    #[validate(length(min = 1, max = 50, message = "Company code is required"))]
    pub company_code: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub company_size: String,
    #[serde(default)]
    pub company_address: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub company_website: String,
    #[serde(default)]
    pub company_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobIntentionPayload {
    #[validate(length(min = 1, max = 100, message = "Position is required"))]
    pub position: String,
    pub salary_range: SalaryRange,
    #[serde(default)]
    pub work_cities: Vec<String>,
    pub job_type: JobType,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub company_size: String,
    #[serde(default)]
    pub other_requirements: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProfileListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
