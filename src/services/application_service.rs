use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::dto::application_dto::{
    ApplicationListQuery, CreateApplicationPayload, ScheduleInterviewPayload,
    UpdateApplicationPayload, UpdateInterviewPayload,
};
use crate::dto::{Page, Paginated};
use crate::error::{Error, Result};
use crate::models::actor::Actor;
use crate::models::application::{
    plan_status_change, ApplicationListing, ApplicationStatus, Interview, InterviewListing,
    StatusChange, StatusLogEntry,
};
use crate::models::notification::{NewNotification, NotificationType};
use crate::models::user::UserType;
use crate::services::notification_service::NotificationService;
use crate::utils::validation::field_error;

const LISTING_SELECT: &str = r#"
    SELECT
        a.id, a.applicant_id, a.job_id, a.cover_letter, a.resume, a.expected_salary, a.status,
        a.hr_notes, a.rejection_reason, a.applied_at, a.updated_at, a.reviewed_at,
        j.title AS job_title, j.company_id, c.company_name,
        sp.user_id AS applicant_user_id, u.real_name AS applicant_name,
        u.phone AS applicant_phone, sp.school AS applicant_school, sp.major AS applicant_major
    FROM job_applications a
    JOIN jobs j ON j.id = a.job_id
    JOIN enterprise_profiles c ON c.id = j.company_id
    JOIN student_profiles sp ON sp.id = a.applicant_id
    JOIN users u ON u.id = sp.user_id
"#;

const INTERVIEW_SELECT: &str = r#"
    SELECT
        i.id, i.application_id, i.interviewer_id, i.interview_type, i.scheduled_time,
        i.duration, i.location, i.status, i.score, i.feedback, i.notes, i.created_at, i.updated_at,
        CASE WHEN iu.real_name = '' THEN iu.phone ELSE iu.real_name END AS interviewer_name,
        j.id AS job_id, j.title AS job_title, c.company_name,
        CASE WHEN u.real_name = '' THEN u.phone ELSE u.real_name END AS applicant_name
    FROM interviews i
    JOIN users iu ON iu.id = i.interviewer_id
    JOIN job_applications a ON a.id = i.application_id
    JOIN jobs j ON j.id = a.job_id
    JOIN enterprise_profiles c ON c.id = j.company_id
    JOIN student_profiles sp ON sp.id = a.applicant_id
    JOIN users u ON u.id = sp.user_id
"#;

const INTERVIEW_COLUMNS: &str = "id, application_id, interviewer_id, interview_type, \
     scheduled_time, duration, location, status, score, feedback, notes, created_at, updated_at";

/// Which applications a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationScope {
    All,
    Applicant(i64),
    Company(i64),
    Nothing,
}

impl ApplicationScope {
    pub fn for_actor(actor: &Actor) -> Self {
        if actor.is_staff() {
            ApplicationScope::All
        } else if let Some(profile) = actor.student_profile() {
            ApplicationScope::Applicant(profile.id)
        } else if let Some(profile) = actor.enterprise_profile() {
            ApplicationScope::Company(profile.id)
        } else {
            ApplicationScope::Nothing
        }
    }

    fn push(self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            ApplicationScope::All => {}
            ApplicationScope::Applicant(id) => {
                qb.push(" AND a.applicant_id = ").push_bind(id);
            }
            ApplicationScope::Company(id) => {
                qb.push(" AND j.company_id = ").push_bind(id);
            }
            ApplicationScope::Nothing => {
                qb.push(" AND FALSE");
            }
        }
    }
}

fn push_application_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    scope: ApplicationScope,
    status: Option<ApplicationStatus>,
    job_id: Option<i64>,
) {
    qb.push(" WHERE TRUE");
    scope.push(qb);
    if let Some(status) = status {
        qb.push(" AND a.status = ").push_bind(status.as_str());
    }
    if let Some(job_id) = job_id {
        qb.push(" AND a.job_id = ").push_bind(job_id);
    }
}

fn status_notice(job_title: &str, status: ApplicationStatus) -> String {
    match status {
        ApplicationStatus::Reviewing => {
            format!("Your application for \"{}\" is being reviewed.", job_title)
        }
        ApplicationStatus::Interview => {
            format!("You have been invited to interview for \"{}\".", job_title)
        }
        ApplicationStatus::Accepted => {
            format!("Congratulations, your application for \"{}\" was accepted.", job_title)
        }
        ApplicationStatus::Rejected => {
            format!("Your application for \"{}\" was not successful.", job_title)
        }
        other => format!(
            "The status of your application for \"{}\" changed to {}.",
            job_title, other
        ),
    }
}

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        query: ApplicationListQuery,
    ) -> Result<Paginated<ApplicationListing>> {
        let page = Page::new(query.page, query.page_size);
        let scope = ApplicationScope::for_actor(actor);
        let status = query
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse::<ApplicationStatus>)
            .transpose()?;

        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM job_applications a JOIN jobs j ON j.id = a.job_id",
        );
        push_application_filters(&mut count_qb, scope, status, query.job_id);
        let count = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(LISTING_SELECT);
        push_application_filters(&mut qb, scope, status, query.job_id);
        qb.push(" ORDER BY a.applied_at DESC, a.id DESC LIMIT ")
            .push_bind(page.page_size)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = qb
            .build_query_as::<ApplicationListing>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Paginated::new(rows, count, page))
    }

    /// Unscoped lookup used before permission checks on writes.
    async fn find_listing(&self, id: i64) -> Result<ApplicationListing> {
        let sql = format!("{} WHERE a.id = $1", LISTING_SELECT);
        sqlx::query_as::<_, ApplicationListing>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))
    }

    pub async fn get(&self, actor: &Actor, id: i64) -> Result<ApplicationListing> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(LISTING_SELECT);
        qb.push(" WHERE a.id = ").push_bind(id);
        ApplicationScope::for_actor(actor).push(&mut qb);
        qb.build_query_as::<ApplicationListing>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))
    }

    pub async fn for_job(&self, job_id: i64) -> Result<Vec<ApplicationListing>> {
        let sql = format!(
            "{} WHERE a.job_id = $1 ORDER BY a.applied_at DESC, a.id DESC",
            LISTING_SELECT
        );
        let rows = sqlx::query_as::<_, ApplicationListing>(&sql)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn apply(
        &self,
        actor: &Actor,
        payload: CreateApplicationPayload,
    ) -> Result<ApplicationListing> {
        match actor.user.kind()? {
            UserType::Student => {}
            UserType::Enterprise => {
                return Err(Error::Forbidden(
                    "Enterprise accounts post jobs and manage hiring, they cannot apply for jobs"
                        .into(),
                ))
            }
            UserType::Admin => {
                return Err(Error::Forbidden(
                    "Administrator accounts cannot apply for jobs".into(),
                ))
            }
        }
        let student = actor.student_profile().ok_or_else(|| {
            field_error(
                "applicant",
                "no_student_profile",
                "No student profile, complete your profile before applying",
            )
        })?;

        let mut tx = self.pool.begin().await?;

        let job_status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM jobs WHERE id = $1 FOR UPDATE",
        )
        .bind(payload.job_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| field_error("job_id", "invalid_job", "Job does not exist"))?;
        if job_status != "published" {
            return Err(field_error(
                "job_id",
                "job_not_open",
                "Job is not open for applications",
            ));
        }

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM job_applications WHERE applicant_id = $1 AND job_id = $2)",
        )
        .bind(student.id)
        .bind(payload.job_id)
        .fetch_one(&mut *tx)
        .await?;
        if duplicate {
            return Err(Error::Conflict("You have already applied to this job".into()));
        }

        let resume = match payload.resume_id {
            Some(resume_id) => Some(
                sqlx::query_scalar::<_, String>(
                    "SELECT file FROM resumes WHERE id = $1 AND user_id = $2",
                )
                .bind(resume_id)
                .bind(actor.id())
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| field_error("resume_id", "invalid_resume", "Resume not found"))?,
            ),
            None => sqlx::query_scalar::<_, String>(
                "SELECT file FROM resumes WHERE user_id = $1 AND is_default LIMIT 1",
            )
            .bind(actor.id())
            .fetch_optional(&mut *tx)
            .await?
            .or_else(|| student.resume.clone()),
        };

        let application_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO job_applications (applicant_id, job_id, cover_letter, resume, expected_salary)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(student.id)
        .bind(payload.job_id)
        .bind(&payload.cover_letter)
        .bind(resume)
        .bind(payload.expected_salary)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match Error::from(e) {
            Error::Conflict(_) => Error::Conflict("You have already applied to this job".into()),
            other => other,
        })?;

        sqlx::query(
            "UPDATE jobs SET application_count = application_count + 1 WHERE id = $1",
        )
        .bind(payload.job_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            application_id,
            job_id = payload.job_id,
            applicant_id = student.id,
            "application submitted"
        );
        self.find_listing(application_id).await
    }

    /// Locks the row, writes the new status and appends the audit entry. Same-status writes are no-ops.
    async fn transition(
        conn: &mut PgConnection,
        actor: &Actor,
        listing: &ApplicationListing,
        new: ApplicationStatus,
        reason: &str,
    ) -> Result<Option<StatusChange>> {
        let current = sqlx::query_scalar::<_, String>(
            "SELECT status FROM job_applications WHERE id = $1 FOR UPDATE",
        )
        .bind(listing.application.id)
        .fetch_one(&mut *conn)
        .await?;
        let old: ApplicationStatus = current.parse()?;

        let Some(change) = plan_status_change(old, new) else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE job_applications
            SET
                status = $2,
                reviewed_at = CASE WHEN $3 THEN NOW() ELSE reviewed_at END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(listing.application.id)
        .bind(change.new.as_str())
        .bind(change.stamps_reviewed_at)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO application_status_logs (application_id, old_status, new_status, changed_by, reason)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(listing.application.id)
        .bind(change.old.as_str())
        .bind(change.new.as_str())
        .bind(actor.id())
        .bind(reason)
        .execute(&mut *conn)
        .await?;

        if actor.id() != listing.applicant_user_id {
            NotificationService::insert(
                &mut *conn,
                &NewNotification {
                    recipient_id: listing.applicant_user_id,
                    title: "Application status updated".to_string(),
                    content: status_notice(&listing.job_title, change.new),
                    notification_type: NotificationType::Application,
                    related_object_id: Some(listing.application.id),
                    related_object_type: "job_application".to_string(),
                },
            )
            .await?;
        }

        tracing::info!(
            application_id = listing.application.id,
            old_status = %change.old,
            new_status = %change.new,
            changed_by = actor.id(),
            "application status changed"
        );
        Ok(Some(change))
    }

    pub async fn approve(&self, actor: &Actor, id: i64) -> Result<ApplicationListing> {
        let listing = self.find_listing(id).await?;
        actor.ensure_can_manage_company(listing.company_id)?;

        let mut tx = self.pool.begin().await?;
        Self::transition(
            &mut tx,
            actor,
            &listing,
            ApplicationStatus::Accepted,
            "Application approved",
        )
        .await?;
        tx.commit().await?;

        self.find_listing(id).await
    }

    pub async fn reject(
        &self,
        actor: &Actor,
        id: i64,
        reason: Option<String>,
    ) -> Result<ApplicationListing> {
        let listing = self.find_listing(id).await?;
        actor.ensure_can_manage_company(listing.company_id)?;
        let reason = reason.unwrap_or_default();

        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE job_applications SET rejection_reason = $2 WHERE id = $1")
            .bind(id)
            .bind(&reason)
            .execute(&mut *tx)
            .await?;
        let log_reason = if reason.is_empty() {
            "Application rejected"
        } else {
            reason.as_str()
        };
        Self::transition(
            &mut tx,
            actor,
            &listing,
            ApplicationStatus::Rejected,
            log_reason,
        )
        .await?;
        tx.commit().await?;

        self.find_listing(id).await
    }

    pub async fn withdraw(&self, actor: &Actor, id: i64) -> Result<ApplicationListing> {
        let listing = self.find_listing(id).await?;
        let owns = actor
            .student_profile()
            .map(|p| p.id == listing.application.applicant_id)
            .unwrap_or(false);
        if !owns {
            return Err(Error::Forbidden(
                "You can only withdraw your own applications".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        Self::transition(
            &mut tx,
            actor,
            &listing,
            ApplicationStatus::Withdrawn,
            "Withdrawn by applicant",
        )
        .await?;
        tx.commit().await?;

        self.find_listing(id).await
    }

    /// Reviewer edit: notes, rejection reason and status in one transaction.
    pub async fn update(
        &self,
        actor: &Actor,
        id: i64,
        payload: UpdateApplicationPayload,
    ) -> Result<ApplicationListing> {
        let listing = self.find_listing(id).await?;
        actor.ensure_can_manage_company(listing.company_id)?;

        let status = payload
            .status
            .as_deref()
            .map(str::parse::<ApplicationStatus>)
            .transpose()?;
        if status == Some(ApplicationStatus::Withdrawn) {
            return Err(Error::InvalidStatus(
                "Only the applicant can withdraw an application".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            UPDATE job_applications
            SET
                hr_notes = COALESCE($2, hr_notes),
                rejection_reason = COALESCE($3, rejection_reason),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(payload.hr_notes.as_deref())
        .bind(payload.rejection_reason.as_deref())
        .execute(&mut *tx)
        .await?;

        if let Some(status) = status {
            let reason = payload.hr_notes.as_deref().unwrap_or_default();
            Self::transition(&mut tx, actor, &listing, status, reason).await?;
        }
        tx.commit().await?;

        self.find_listing(id).await
    }

    /// Audit trail, newest first. Hidden applications surface as `NotFound`.
    pub async fn status_logs(&self, actor: &Actor, id: i64) -> Result<Vec<StatusLogEntry>> {
        let application = self.get(actor, id).await?;
        let rows = sqlx::query_as::<_, StatusLogEntry>(
            r#"
            SELECT
                l.id, l.application_id, l.old_status, l.new_status, l.changed_by, l.reason,
                l.created_at,
                CASE WHEN u.real_name = '' THEN u.phone ELSE u.real_name END AS changed_by_name
            FROM application_status_logs l
            JOIN users u ON u.id = l.changed_by
            WHERE l.application_id = $1
            ORDER BY l.created_at DESC, l.id DESC
            "#,
        )
        .bind(application.application.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn schedule_interview(
        &self,
        actor: &Actor,
        application_id: i64,
        payload: ScheduleInterviewPayload,
    ) -> Result<InterviewListing> {
        let listing = self.find_listing(application_id).await?;
        actor.ensure_can_manage_company(listing.company_id)?;

        let mut tx = self.pool.begin().await?;
        let sql = format!(
            r#"
            INSERT INTO interviews (
                application_id, interviewer_id, interview_type, scheduled_time, duration,
                location, notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            INTERVIEW_COLUMNS
        );
        let interview = sqlx::query_as::<_, Interview>(&sql)
            .bind(application_id)
            .bind(actor.id())
            .bind(payload.interview_type.as_str())
            .bind(payload.scheduled_time)
            .bind(payload.duration.unwrap_or(60))
            .bind(&payload.location)
            .bind(&payload.notes)
            .fetch_one(&mut *tx)
            .await?;

        Self::transition(
            &mut tx,
            actor,
            &listing,
            ApplicationStatus::Interview,
            "Interview scheduled",
        )
        .await?;

        NotificationService::insert(
            &mut *tx,
            &NewNotification {
                recipient_id: listing.applicant_user_id,
                title: "Interview scheduled".to_string(),
                content: format!(
                    "A {} interview for \"{}\" is scheduled at {}.",
                    payload.interview_type,
                    listing.job_title,
                    payload.scheduled_time.format("%Y-%m-%d %H:%M UTC")
                ),
                notification_type: NotificationType::Interview,
                related_object_id: Some(interview.id),
                related_object_type: "interview".to_string(),
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            interview_id = interview.id,
            application_id,
            "interview scheduled"
        );
        self.find_interview(interview.id).await
    }

    async fn find_interview(&self, id: i64) -> Result<InterviewListing> {
        let sql = format!("{} WHERE i.id = $1", INTERVIEW_SELECT);
        sqlx::query_as::<_, InterviewListing>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".into()))
    }

    pub async fn list_interviews(&self, actor: &Actor) -> Result<Vec<InterviewListing>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(INTERVIEW_SELECT);
        qb.push(" WHERE TRUE");
        ApplicationScope::for_actor(actor).push(&mut qb);
        qb.push(" ORDER BY i.scheduled_time DESC, i.id DESC");
        let rows = qb
            .build_query_as::<InterviewListing>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn update_interview(
        &self,
        actor: &Actor,
        id: i64,
        payload: UpdateInterviewPayload,
    ) -> Result<InterviewListing> {
        let company_id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT j.company_id
            FROM interviews i
            JOIN job_applications a ON a.id = i.application_id
            JOIN jobs j ON j.id = a.job_id
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Interview not found".into()))?;
        actor.ensure_can_manage_company(company_id)?;

        sqlx::query(
            r#"
            UPDATE interviews
            SET
                status = COALESCE($2, status),
                scheduled_time = COALESCE($3, scheduled_time),
                duration = COALESCE($4, duration),
                location = COALESCE($5, location),
                score = COALESCE($6, score),
                feedback = COALESCE($7, feedback),
                notes = COALESCE($8, notes),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(payload.status.map(|s| s.as_str()))
        .bind(payload.scheduled_time)
        .bind(payload.duration)
        .bind(payload.location)
        .bind(payload.score)
        .bind(payload.feedback)
        .bind(payload.notes)
        .execute(&self.pool)
        .await?;

        tracing::info!(interview_id = id, user_id = actor.id(), "interview updated");
        self.find_interview(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::actor::fixtures;

    #[test]
    fn scope_follows_actor_profile() {
        assert_eq!(
            ApplicationScope::for_actor(&fixtures::admin(1)),
            ApplicationScope::All
        );
        assert_eq!(
            ApplicationScope::for_actor(&fixtures::student(2, 20)),
            ApplicationScope::Applicant(20)
        );
        assert_eq!(
            ApplicationScope::for_actor(&fixtures::enterprise(3, 30)),
            ApplicationScope::Company(30)
        );
    }

    #[test]
    fn incomplete_profiles_see_nothing() {
        use crate::models::actor::{Actor, Profile};
        use crate::models::user::UserType;

        let actor = Actor::new(
            fixtures::user(4, UserType::Student),
            Profile::Incomplete(UserType::Student),
        );
        assert_eq!(ApplicationScope::for_actor(&actor), ApplicationScope::Nothing);
    }

    #[test]
    fn notices_name_the_job() {
        let text = status_notice("Data intern", ApplicationStatus::Accepted);
        assert!(text.contains("Data intern"));
        assert!(text.contains("accepted"));
        assert!(status_notice("X", ApplicationStatus::Pending).contains("pending"));
    }
}
