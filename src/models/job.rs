use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

use crate::error::{Error, Result};

text_enum!(JobStatus {
    Draft => "draft",
    Published => "published",
    Paused => "paused",
    Closed => "closed",
});

impl JobStatus {
    /// Statuses an owner or administrator may set directly.
    pub const SETTABLE: &'static [JobStatus] =
        &[JobStatus::Published, JobStatus::Draft, JobStatus::Closed];

    pub fn parse_settable(raw: &str) -> Result<Self> {
        match raw.parse::<JobStatus>() {
            Ok(status) if Self::SETTABLE.contains(&status) => Ok(status),
            _ => Err(Error::InvalidStatus(format!(
                "Invalid status '{}', expected one of: published, draft, closed",
                raw
            ))),
        }
    }
}

text_enum!(JobType {
    FullTime => "full_time",
    PartTime => "part_time",
    Internship => "internship",
    Contract => "contract",
});

text_enum!(SalaryType {
    Monthly => "monthly",
    Yearly => "yearly",
    Hourly => "hourly",
    Negotiable => "negotiable",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobCategory {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub parent_id: Option<i64>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub company_id: i64,
    pub category_id: Option<i64>,
    pub title: String,
    pub job_type: String,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    pub salary_type: String,
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

impl Job {
    /// Open for applications: published and the deadline (if any) not yet passed.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Published.as_str()
            && self.application_deadline.map(|d| d > now).unwrap_or(true)
    }

    pub fn salary_range(&self) -> String {
        salary_range_display(self.salary_min, self.salary_max, &self.salary_type)
    }
}

/// A job joined with its company and category, plus the viewer's favorite flag.
#[derive(Debug, Clone, FromRow)]
pub struct JobListing {
    #[sqlx(flatten)]
    pub job: Job,
    pub company_name: String,
    pub company_industry: String,
    pub company_size: String,
    pub company_address: String,
    pub company_is_verified: bool,
    pub category_name: Option<String>,
    pub is_favorited: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobFavorite {
    pub id: i64,
    pub user_id: i64,
    pub job_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A favorited job in the viewer's list.
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteListing {
    pub favorite_id: i64,
    pub favorited_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub listing: JobListing,
}

fn thousands(value: Decimal) -> i64 {
    (value / Decimal::from(1000)).trunc().to_i64().unwrap_or(0)
}

fn ten_thousands(value: Decimal) -> i64 {
    (value / Decimal::from(10000)).trunc().to_i64().unwrap_or(0)
}

/// Salary label shown on listings: `5K-8K` for monthly pay, `10万-20万` yearly.
pub fn salary_range_display(
    min: Option<Decimal>,
    max: Option<Decimal>,
    salary_type: &str,
) -> String {
    match (min, max) {
        (Some(min), Some(max)) => match salary_type {
            "monthly" => format!("{}K-{}K", thousands(min), thousands(max)),
            "yearly" => format!("{}万-{}万", ten_thousands(min), ten_thousands(max)),
            _ => format!("{}-{}", min.normalize(), max.normalize()),
        },
        (Some(min), None) => match salary_type {
            "monthly" => format!("{}K+", thousands(min)),
            _ => format!("{}+", min.normalize()),
        },
        _ => "Negotiable".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn job(status: &str, deadline: Option<DateTime<Utc>>) -> Job {
        Job {
            id: 1,
            company_id: 1,
            category_id: None,
            title: "Backend intern".into(),
            job_type: "internship".into(),
            salary_min: None,
            salary_max: None,
            salary_type: "monthly".into(),
            work_city: "Beijing".into(),
            work_address: String::new(),
            experience_required: String::new(),
            education_required: String::new(),
            skills_required: serde_json::json!([]),
            description: "desc".into(),
            responsibilities: String::new(),
            benefits: String::new(),
            recruitment_count: 1,
            application_deadline: deadline,
            status: status.into(),
            view_count: 0,
            application_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            published_at: None,
        }
    }

    #[test]
    fn settable_statuses_exclude_paused() {
        assert_eq!(
            JobStatus::parse_settable("published").unwrap(),
            JobStatus::Published
        );
        assert!(matches!(
            JobStatus::parse_settable("paused"),
            Err(Error::InvalidStatus(_))
        ));
        assert!(JobStatus::parse_settable("archived").is_err());
    }

    #[test]
    fn active_requires_published_and_open_deadline() {
        let now = Utc::now();
        assert!(job("published", None).is_active_at(now));
        assert!(job("published", Some(now + Duration::days(1))).is_active_at(now));
        assert!(!job("published", Some(now - Duration::days(1))).is_active_at(now));
        assert!(!job("draft", None).is_active_at(now));
    }

    #[test]
    fn salary_labels() {
        let d = |v: i64| Some(Decimal::from(v));
        assert_eq!(salary_range_display(d(5000), d(8000), "monthly"), "5K-8K");
        assert_eq!(
            salary_range_display(d(100000), d(200000), "yearly"),
            "10万-20万"
        );
        assert_eq!(salary_range_display(d(50), d(80), "hourly"), "50-80");
        assert_eq!(salary_range_display(d(6000), None, "monthly"), "6K+");
        assert_eq!(salary_range_display(None, None, "monthly"), "Negotiable");
    }
}
