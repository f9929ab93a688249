use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

text_enum!(ApplicationStatus {
    Pending => "pending",
    Reviewing => "reviewing",
    Interview => "interview",
    Accepted => "accepted",
    Rejected => "rejected",
    Withdrawn => "withdrawn",
});

text_enum!(InterviewType {
    Phone => "phone",
    Video => "video",
    Onsite => "onsite",
    Group => "group",
});

text_enum!(InterviewStatus {
    Scheduled => "scheduled",
    Confirmed => "confirmed",
    Completed => "completed",
    Cancelled => "cancelled",
    Rescheduled => "rescheduled",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobApplication {
    pub id: i64,
    pub applicant_id: i64,
    pub job_id: i64,
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

/// Application joined with the job, company and applicant it connects.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationListing {
    #[sqlx(flatten)]
    pub application: JobApplication,
    pub job_title: String,
    pub company_id: i64,
    pub company_name: String,
    pub applicant_user_id: i64,
    pub applicant_name: String,
    pub applicant_phone: String,
    pub applicant_school: String,
    pub applicant_major: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationStatusLog {
    pub id: i64,
    pub application_id: i64,
    pub old_status: String,
    pub new_status: String,
    pub changed_by: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct StatusLogEntry {
    #[sqlx(flatten)]
    pub log: ApplicationStatusLog,
    pub changed_by_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interview {
    pub id: i64,
    pub application_id: i64,
    pub interviewer_id: i64,
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

#[derive(Debug, Clone, FromRow)]
pub struct InterviewListing {
    #[sqlx(flatten)]
    pub interview: Interview,
    pub interviewer_name: String,
    pub job_id: i64,
    pub job_title: String,
    pub company_name: String,
    pub applicant_name: String,
}

/// Bookkeeping for a single status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub old: ApplicationStatus,
    pub new: ApplicationStatus,
    pub stamps_reviewed_at: bool,
}

/// Returns the change to persist and log, or `None` when the status is unchanged.
pub fn plan_status_change(old: ApplicationStatus, new: ApplicationStatus) -> Option<StatusChange> {
    if old == new {
        return None;
    }
    Some(StatusChange {
        old,
        new,
        stamps_reviewed_at: new == ApplicationStatus::Accepted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_status_is_not_a_change() {
        for status in ApplicationStatus::ALL {
            assert_eq!(plan_status_change(*status, *status), None);
        }
    }

    #[test]
    fn accepting_stamps_review_time() {
        let change =
            plan_status_change(ApplicationStatus::Pending, ApplicationStatus::Accepted).unwrap();
        assert!(change.stamps_reviewed_at);
        assert_eq!(change.old, ApplicationStatus::Pending);

        let change =
            plan_status_change(ApplicationStatus::Pending, ApplicationStatus::Rejected).unwrap();
        assert!(!change.stamps_reviewed_at);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("hired".parse::<ApplicationStatus>().is_err());
        assert_eq!(
            "withdrawn".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Withdrawn
        );
    }
}
