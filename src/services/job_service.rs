use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::dto::admin_dto::AdminJobQuery;
use crate::dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload};
use crate::dto::{Page, Paginated};
use crate::error::{Error, Result};
use crate::models::actor::Actor;
use crate::models::job::{FavoriteListing, Job, JobCategory, JobListing, JobStatus, SalaryType};
use crate::models::user::UserType;
use crate::utils::validation::{ensure_salary_range, field_error};

pub const JOB_COLUMNS: &str = "id, company_id, category_id, title, job_type, salary_min, \
     salary_max, salary_type, work_city, work_address, experience_required, education_required, \
     skills_required, description, responsibilities, benefits, recruitment_count, \
     application_deadline, status, view_count, application_count, created_at, updated_at, published_at";

const LISTING_COLUMNS: &str = "j.id, j.company_id, j.category_id, j.title, j.job_type, \
     j.salary_min, j.salary_max, j.salary_type, j.work_city, j.work_address, \
     j.experience_required, j.education_required, j.skills_required, j.description, \
     j.responsibilities, j.benefits, j.recruitment_count, j.application_deadline, j.status, \
     j.view_count, j.application_count, j.created_at, j.updated_at, j.published_at, \
     c.company_name, c.industry AS company_industry, c.company_size, c.company_address, \
     c.is_verified AS company_is_verified, cat.name AS category_name";

const LISTING_JOINS: &str = " FROM jobs j \
     JOIN enterprise_profiles c ON c.id = j.company_id \
     LEFT JOIN job_categories cat ON cat.id = j.category_id";

pub const DEFAULT_SHOWCASE_LIMIT: i64 = 6;

/// Maps an `ordering` query value onto a fixed ORDER BY clause.
pub fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering.unwrap_or("-created_at") {
        "created_at" => "j.created_at ASC, j.id ASC",
        "salary_min" => "j.salary_min ASC NULLS LAST, j.id DESC",
        "-salary_min" => "j.salary_min DESC NULLS LAST, j.id DESC",
        "salary_max" => "j.salary_max ASC NULLS LAST, j.id DESC",
        "-salary_max" => "j.salary_max DESC NULLS LAST, j.id DESC",
        "view_count" => "j.view_count ASC, j.id DESC",
        "-view_count" => "j.view_count DESC, j.id DESC",
        _ => "j.created_at DESC, j.id DESC",
    }
}

/// Splits `"rust, sql,"` into the non-empty trimmed skills.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn push_listing_select(qb: &mut QueryBuilder<'_, Postgres>, viewer: Option<i64>) {
    qb.push("SELECT ")
        .push(LISTING_COLUMNS)
        .push(", EXISTS(SELECT 1 FROM job_favorites f WHERE f.job_id = j.id AND f.user_id = ")
        .push_bind(viewer)
        .push(") AS is_favorited")
        .push(LISTING_JOINS);
}

fn push_job_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &JobListQuery, status: JobStatus) {
    qb.push(" WHERE j.status = ").push_bind(status.as_str());

    if let Some(job_type) = query.job_type.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND j.job_type = ").push_bind(job_type.to_string());
    }
    if let Some(city) = query.work_city.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND j.work_city ILIKE ")
            .push_bind(format!("%{}%", city));
    }
    if let Some(category) = query.category {
        qb.push(" AND j.category_id = ").push_bind(category);
    }
    if let Some(company) = query.company {
        qb.push(" AND j.company_id = ").push_bind(company);
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        qb.push(" AND (j.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR j.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR j.skills_required::text ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.company_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(min) = query.salary_min {
        qb.push(" AND j.salary_min >= ").push_bind(min);
    }
    if let Some(max) = query.salary_max {
        qb.push(" AND j.salary_max <= ").push_bind(max);
    }
    if let Some(experience) = query.experience.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND j.experience_required ILIKE ")
            .push_bind(format!("%{}%", experience));
    }
    if let Some(skills) = query.skills.as_deref() {
        for skill in parse_skills(skills) {
            qb.push(" AND j.skills_required::text ILIKE ")
                .push_bind(format!("%{}%", skill));
        }
    }
}

fn push_admin_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &AdminJobQuery) {
    qb.push(" WHERE TRUE");
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND j.status = ").push_bind(status.to_string());
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        qb.push(" AND (j.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.company_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR j.work_city ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Public listing. Only staff may ask for a status other than `published`.
    pub async fn list(
        &self,
        viewer: Option<&Actor>,
        query: JobListQuery,
    ) -> Result<Paginated<JobListing>> {
        let page = Page::new(query.page, query.page_size);
        let requested = query
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse::<JobStatus>)
            .transpose()?;
        let status = match (requested, viewer.map(Actor::is_staff).unwrap_or(false)) {
            (Some(status), true) => status,
            _ => JobStatus::Published,
        };

        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*)");
        count_qb.push(LISTING_JOINS);
        push_job_filters(&mut count_qb, &query, status);
        let count = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("");
        push_listing_select(&mut qb, viewer.map(Actor::id));
        push_job_filters(&mut qb, &query, status);
        qb.push(" ORDER BY ")
            .push(order_clause(query.ordering.as_deref()))
            .push(" LIMIT ")
            .push_bind(page.page_size)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let jobs = qb
            .build_query_as::<JobListing>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Paginated::new(jobs, count, page))
    }

    pub async fn latest(&self, viewer: Option<&Actor>, limit: Option<i64>) -> Result<Vec<JobListing>> {
        self.showcase(
            viewer,
            "j.published_at DESC NULLS LAST, j.created_at DESC",
            limit,
        )
        .await
    }

    pub async fn hot(&self, viewer: Option<&Actor>, limit: Option<i64>) -> Result<Vec<JobListing>> {
        self.showcase(
            viewer,
            "j.view_count DESC, j.application_count DESC, j.id DESC",
            limit,
        )
        .await
    }

    async fn showcase(
        &self,
        viewer: Option<&Actor>,
        order: &'static str,
        limit: Option<i64>,
    ) -> Result<Vec<JobListing>> {
        let limit = limit.unwrap_or(DEFAULT_SHOWCASE_LIMIT).clamp(1, 50);
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("");
        push_listing_select(&mut qb, viewer.map(Actor::id));
        qb.push(" WHERE j.status = 'published' ORDER BY ")
            .push(order)
            .push(" LIMIT ")
            .push_bind(limit);
        let jobs = qb
            .build_query_as::<JobListing>()
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    pub async fn categories(&self) -> Result<Vec<JobCategory>> {
        let rows = sqlx::query_as::<_, JobCategory>(
            r#"
            SELECT id, name, description, parent_id, sort_order, is_active, created_at
            FROM job_categories
            WHERE is_active
            ORDER BY sort_order, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_job(&self, id: i64) -> Result<Job> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))
    }

    async fn find_listing(&self, viewer: Option<&Actor>, id: i64) -> Result<Option<JobListing>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("");
        push_listing_select(&mut qb, viewer.map(Actor::id));
        qb.push(" WHERE j.id = ").push_bind(id);
        let listing = qb
            .build_query_as::<JobListing>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(listing)
    }

    /// Detail fetch. Every call bumps `view_count`; unpublished jobs are only visible to their managers.
    pub async fn view(&self, viewer: Option<&Actor>, id: i64) -> Result<JobListing> {
        let mut listing = self
            .find_listing(viewer, id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))?;

        let published = listing.job.status == JobStatus::Published.as_str();
        let manager = viewer
            .map(|a| a.can_manage_company(listing.job.company_id))
            .unwrap_or(false);
        if !published && !manager {
            return Err(Error::NotFound("Job not found".into()));
        }

        let view_count = sqlx::query_scalar::<_, i64>(
            "UPDATE jobs SET view_count = view_count + 1 WHERE id = $1 RETURNING view_count",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        listing.job.view_count = view_count;
        Ok(listing)
    }

    async fn ensure_category(&self, category_id: Option<i64>) -> Result<()> {
        let Some(id) = category_id else {
            return Ok(());
        };
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM job_categories WHERE id = $1 AND is_active)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        if !exists {
            return Err(field_error(
                "category_id",
                "invalid_category",
                "Job category does not exist",
            ));
        }
        Ok(())
    }

    pub async fn create(&self, actor: &Actor, payload: CreateJobPayload) -> Result<Job> {
        if actor.user.kind()? != UserType::Enterprise {
            return Err(field_error(
                "company",
                "not_enterprise",
                "Only enterprise users can post jobs",
            ));
        }
        let company = actor.enterprise_profile().ok_or_else(|| {
            field_error(
                "company",
                "enterprise_profile_missing",
                "Enterprise profile missing, complete your company information first",
            )
        })?;
        ensure_salary_range(payload.salary_min, payload.salary_max)?;
        self.ensure_category(payload.category_id).await?;

        let status = payload.status.unwrap_or(JobStatus::Draft);
        let skills = serde_json::to_value(payload.skills_required.unwrap_or_default())?;
        let sql = format!(
            r#"
            INSERT INTO jobs (
                company_id, category_id, title, job_type, salary_min, salary_max, salary_type,
                work_city, work_address, experience_required, education_required, skills_required,
                description, responsibilities, benefits, recruitment_count, application_deadline,
                status, published_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18,
                CASE WHEN $18 = 'published' THEN NOW() ELSE NULL END
            )
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(company.id)
            .bind(payload.category_id)
            .bind(&payload.title)
            .bind(payload.job_type.as_str())
            .bind(payload.salary_min)
            .bind(payload.salary_max)
            .bind(payload.salary_type.unwrap_or(SalaryType::Monthly).as_str())
            .bind(&payload.work_city)
            .bind(payload.work_address.unwrap_or_default())
            .bind(payload.experience_required.unwrap_or_default())
            .bind(payload.education_required.unwrap_or_default())
            .bind(skills)
            .bind(&payload.description)
            .bind(payload.responsibilities.unwrap_or_default())
            .bind(payload.benefits.unwrap_or_default())
            .bind(payload.recruitment_count.unwrap_or(1))
            .bind(payload.application_deadline)
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(job_id = job.id, company_id = company.id, status = %job.status, "job created");
        Ok(job)
    }

    pub async fn update(&self, actor: &Actor, id: i64, payload: UpdateJobPayload) -> Result<Job> {
        let job = self.get_job(id).await?;
        actor.ensure_can_manage_company(job.company_id)?;
        ensure_salary_range(
            payload.salary_min.or(job.salary_min),
            payload.salary_max.or(job.salary_max),
        )?;
        self.ensure_category(payload.category_id).await?;

        let skills = payload
            .skills_required
            .map(serde_json::to_value)
            .transpose()?;
        let sql = format!(
            r#"
            UPDATE jobs
            SET
                title = COALESCE($2, title),
                category_id = COALESCE($3, category_id),
                job_type = COALESCE($4, job_type),
                salary_min = COALESCE($5, salary_min),
                salary_max = COALESCE($6, salary_max),
                salary_type = COALESCE($7, salary_type),
                work_city = COALESCE($8, work_city),
                work_address = COALESCE($9, work_address),
                experience_required = COALESCE($10, experience_required),
                education_required = COALESCE($11, education_required),
                skills_required = COALESCE($12, skills_required),
                description = COALESCE($13, description),
                responsibilities = COALESCE($14, responsibilities),
                benefits = COALESCE($15, benefits),
                recruitment_count = COALESCE($16, recruitment_count),
                application_deadline = COALESCE($17, application_deadline),
                status = COALESCE($18, status),
                published_at = CASE
                    WHEN $18 = 'published' AND published_at IS NULL THEN NOW()
                    ELSE published_at
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .bind(payload.title)
            .bind(payload.category_id)
            .bind(payload.job_type.map(|t| t.as_str()))
            .bind(payload.salary_min)
            .bind(payload.salary_max)
            .bind(payload.salary_type.map(|t| t.as_str()))
            .bind(payload.work_city)
            .bind(payload.work_address)
            .bind(payload.experience_required)
            .bind(payload.education_required)
            .bind(skills)
            .bind(payload.description)
            .bind(payload.responsibilities)
            .bind(payload.benefits)
            .bind(payload.recruitment_count)
            .bind(payload.application_deadline)
            .bind(payload.status.map(|s| s.as_str()))
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(job_id = job.id, user_id = actor.id(), "job updated");
        Ok(job)
    }

    pub async fn delete(&self, actor: &Actor, id: i64) -> Result<()> {
        let job = self.get_job(id).await?;
        actor.ensure_can_manage_company(job.company_id)?;
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::info!(job_id = id, user_id = actor.id(), "job deleted");
        Ok(())
    }

    /// Sets one of the directly settable statuses. No transition order is enforced.
    pub async fn change_status(&self, actor: &Actor, id: i64, raw_status: &str) -> Result<Job> {
        let status = JobStatus::parse_settable(raw_status)?;
        let job = self.get_job(id).await?;
        actor.ensure_can_manage_company(job.company_id)?;

        let sql = format!(
            r#"
            UPDATE jobs
            SET
                status = $2,
                published_at = CASE
                    WHEN $2 = 'published' AND published_at IS NULL THEN NOW()
                    ELSE published_at
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let updated = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(
            job_id = id,
            old_status = %job.status,
            new_status = %updated.status,
            "job status changed"
        );
        Ok(updated)
    }

    /// The caller's company jobs in any status; empty for anyone without an enterprise profile.
    pub async fn enterprise_jobs(&self, actor: &Actor) -> Result<Vec<JobListing>> {
        let Some(company) = actor.enterprise_profile() else {
            return Ok(Vec::new());
        };
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("");
        push_listing_select(&mut qb, Some(actor.id()));
        qb.push(" WHERE j.company_id = ")
            .push_bind(company.id)
            .push(" ORDER BY j.created_at DESC, j.id DESC");
        let jobs = qb
            .build_query_as::<JobListing>()
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    /// Returns `true` when a new favorite was stored, `false` when it already existed.
    pub async fn favorite(&self, actor: &Actor, job_id: i64) -> Result<bool> {
        self.get_job(job_id).await?;
        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO job_favorites (user_id, job_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, job_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(actor.id())
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(inserted.is_some())
    }

    pub async fn unfavorite(&self, actor: &Actor, job_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM job_favorites WHERE user_id = $1 AND job_id = $2")
            .bind(actor.id())
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Job is not in your favorites".into()));
        }
        Ok(())
    }

    pub async fn favorites(&self, actor: &Actor) -> Result<Vec<FavoriteListing>> {
        let sql = format!(
            r#"
            SELECT f.id AS favorite_id, f.created_at AS favorited_at, {}, TRUE AS is_favorited
            {}
            JOIN job_favorites f ON f.job_id = j.id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC, f.id DESC
            "#,
            LISTING_COLUMNS, LISTING_JOINS
        );
        let rows = sqlx::query_as::<_, FavoriteListing>(&sql)
            .bind(actor.id())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn admin_list(&self, query: AdminJobQuery) -> Result<Paginated<JobListing>> {
        let page = Page::new(query.page, query.page_size);

        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*)");
        count_qb.push(LISTING_JOINS);
        push_admin_filters(&mut count_qb, &query);
        let count = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("");
        push_listing_select(&mut qb, None);
        push_admin_filters(&mut qb, &query);
        qb.push(" ORDER BY j.created_at DESC, j.id DESC LIMIT ")
            .push_bind(page.page_size)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let jobs = qb
            .build_query_as::<JobListing>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Paginated::new(jobs, count, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_defaults_to_newest_first() {
        assert_eq!(order_clause(None), "j.created_at DESC, j.id DESC");
        assert_eq!(order_clause(Some("bogus; DROP TABLE jobs")), order_clause(None));
        assert_eq!(order_clause(Some("-view_count")), "j.view_count DESC, j.id DESC");
        assert!(order_clause(Some("salary_min")).starts_with("j.salary_min ASC"));
    }

    #[test]
    fn skills_are_split_and_trimmed() {
        assert_eq!(parse_skills(" rust, sql ,,"), vec!["rust", "sql"]);
        assert!(parse_skills("").is_empty());
    }
}
