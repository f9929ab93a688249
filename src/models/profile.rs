use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

text_enum!(SalaryRange {
    From3kTo5k => "3K-5K",
    From5kTo10k => "5K-10K",
    From10kTo15k => "10K-15K",
    From15kTo25k => "15K-25K",
    From25kTo35k => "25K-35K",
    Above35k => "35K+",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentProfile {
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

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EnterpriseProfile {
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

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobIntention {
    pub id: i64,
    pub user_id: i64,
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

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resume {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub file: String,
    pub file_size: i64,
    pub file_type: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Human readable size, e.g. `512 B`, `1.5 KB`, `2.0 MB`.
pub fn format_file_size(size: i64) -> String {
    if size < 1024 {
        format!("{} B", size)
    } else if size < 1024 * 1024 {
        format!("{:.1} KB", size as f64 / 1024.0)
    } else {
        format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_size_display_picks_unit() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn salary_range_parses_labels() {
        assert_eq!("35K+".parse::<SalaryRange>().unwrap(), SalaryRange::Above35k);
        assert!("1K-2K".parse::<SalaryRange>().is_err());
    }
}
