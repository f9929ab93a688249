use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::models::job::{
    FavoriteListing, Job, JobCategory, JobListing, JobStatus, JobType, SalaryType,
};
use crate::utils::validation::validate_skill_list;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub category_id: Option<i64>,
    pub job_type: JobType,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub salary_type: Option<SalaryType>,
    #[validate(length(min = 1, max = 100, message = "Work city is required"))]
    pub work_city: String,
    pub work_address: Option<String>,
    #[validate(length(max = 100))]
    pub experience_required: Option<String>,
    #[validate(length(max = 100))]
    pub education_required: Option<String>,
    #[validate(custom(function = "validate_skill_list"))]
    pub skills_required: Option<Vec<String>>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    #[validate(range(min = 1, message = "Recruitment count must be at least 1"))]
    pub recruitment_count: Option<i32>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub category_id: Option<i64>,
    pub job_type: Option<JobType>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub salary_type: Option<SalaryType>,
    #[validate(length(min = 1, max = 100))]
    pub work_city: Option<String>,
    pub work_address: Option<String>,
    #[validate(length(max = 100))]
    pub experience_required: Option<String>,
    #[validate(length(max = 100))]
    pub education_required: Option<String>,
    #[validate(custom(function = "validate_skill_list"))]
    pub skills_required: Option<Vec<String>>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    #[validate(range(min = 1))]
    pub recruitment_count: Option<i32>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub status: Option<JobStatus>,
}

/// Raw status string; parsed against the settable set so bad values surface as `InvalidStatus`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
    pub job_type: Option<String>,
    pub work_city: Option<String>,
    pub category: Option<i64>,
    pub company: Option<i64>,
    pub search: Option<String>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub experience: Option<String>,
    pub skills: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub parent: Option<i64>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<JobCategory> for JobCategoryResponse {
    fn from(value: JobCategory) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            parent: value.parent_id,
            sort_order: value.sort_order,
            is_active: value.is_active,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummaryResponse {
    pub id: i64,
    pub title: String,
    pub company_id: i64,
    pub company_name: String,
    pub company_industry: String,
    pub company_size: String,
    pub category_name: Option<String>,
    pub job_type: String,
    pub salary_range: String,
    pub location: String,
    pub work_city: String,
    pub experience_required: String,
    pub education_required: String,
    pub skills_required: JsonValue,
    pub description: String,
    pub recruitment_count: i32,
    pub status: String,
    pub view_count: i64,
    pub application_count: i64,
    pub is_favorited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<JobListing> for JobSummaryResponse {
    fn from(value: JobListing) -> Self {
        let salary_range = value.job.salary_range();
        let job = value.job;
        Self {
            id: job.id,
            title: job.title,
            company_id: job.company_id,
            company_name: value.company_name,
            company_industry: value.company_industry,
            company_size: value.company_size,
            category_name: value.category_name,
            job_type: job.job_type,
            salary_range,
            location: job.work_city.clone(),
            work_city: job.work_city,
            experience_required: job.experience_required,
            education_required: job.education_required,
            skills_required: job.skills_required,
            description: job.description,
            recruitment_count: job.recruitment_count,
            status: job.status,
            view_count: job.view_count,
            application_count: job.application_count,
            is_favorited: value.is_favorited,
            created_at: job.created_at,
            updated_at: job.updated_at,
            published_at: job.published_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyBrief {
    pub id: i64,
    pub company_name: String,
    pub industry: String,
    pub company_size: String,
    pub company_address: String,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBrief {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetailResponse {
    pub id: i64,
    pub title: String,
    pub company: CompanyBrief,
    pub category: Option<CategoryBrief>,
    pub job_type: String,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub salary_type: String,
    pub salary_range: String,
    pub work_city: String,
    pub work_address: String,
    pub experience_required: String,
    pub education_required: String,
    pub skills_required: JsonValue,
    pub description: String,
    pub responsibilities: String,
    pub benefits: String,
    pub recruitment_count: i32,
    pub application_deadline: Option<DateTime<Utc>>,
    pub status: String,
    pub is_active: bool,
    pub view_count: i64,
    pub application_count: i64,
    pub is_favorited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<JobListing> for JobDetailResponse {
    fn from(value: JobListing) -> Self {
        let salary_range = value.job.salary_range();
        let is_active = value.job.is_active_at(Utc::now());
        let job = value.job;
        let category = match (job.category_id, value.category_name) {
            (Some(id), Some(name)) => Some(CategoryBrief { id, name }),
            _ => None,
        };
        Self {
            id: job.id,
            title: job.title,
            company: CompanyBrief {
                id: job.company_id,
                company_name: value.company_name,
                industry: value.company_industry,
                company_size: value.company_size,
                company_address: value.company_address,
                is_verified: value.company_is_verified,
            },
            category,
            job_type: job.job_type,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            salary_type: job.salary_type,
            salary_range,
            work_city: job.work_city,
            work_address: job.work_address,
            experience_required: job.experience_required,
            education_required: job.education_required,
            skills_required: job.skills_required,
            description: job.description,
            responsibilities: job.responsibilities,
            benefits: job.benefits,
            recruitment_count: job.recruitment_count,
            application_deadline: job.application_deadline,
            status: job.status,
            is_active,
            view_count: job.view_count,
            application_count: job.application_count,
            is_favorited: value.is_favorited,
            created_at: job.created_at,
            updated_at: job.updated_at,
            published_at: job.published_at,
        }
    }
}

/// Plain job row, returned from writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: i64,
    pub company_id: i64,
    pub category_id: Option<i64>,
    pub title: String,
    pub job_type: String,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub salary_type: String,
    pub salary_range: String,
    pub work_city: String,
    pub work_address: String,
    pub experience_required: String,
    pub education_required: String,
    pub skills_required: JsonValue,
    pub description: String,
    pub responsibilities: String,
    pub benefits: String,
    pub recruitment_count: i32,
    pub application_deadline: Option<DateTime<Utc>>,
    pub status: String,
    pub view_count: i64,
    pub application_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<Job> for JobResponse {
    fn from(value: Job) -> Self {
        let salary_range = value.salary_range();
        Self {
            id: value.id,
            company_id: value.company_id,
            category_id: value.category_id,
            title: value.title,
            job_type: value.job_type,
            salary_min: value.salary_min,
            salary_max: value.salary_max,
            salary_type: value.salary_type,
            salary_range,
            work_city: value.work_city,
            work_address: value.work_address,
            experience_required: value.experience_required,
            education_required: value.education_required,
            skills_required: value.skills_required,
            description: value.description,
            responsibilities: value.responsibilities,
            benefits: value.benefits,
            recruitment_count: value.recruitment_count,
            application_deadline: value.application_deadline,
            status: value.status,
            view_count: value.view_count,
            application_count: value.application_count,
            created_at: value.created_at,
            updated_at: value.updated_at,
            published_at: value.published_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteResponse {
    pub id: i64,
    pub job: JobSummaryResponse,
    pub created_at: DateTime<Utc>,
}

impl From<FavoriteListing> for FavoriteResponse {
    fn from(value: FavoriteListing) -> Self {
        Self {
            id: value.favorite_id,
            job: value.listing.into(),
            created_at: value.favorited_at,
        }
    }
}
