use std::net::IpAddr;

use chrono::Duration;
use sqlx::types::ipnetwork::IpNetwork;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::config::get_config;
use crate::dto::admin_dto::AdminUserQuery;
use crate::dto::auth_dto::RegisterPayload;
use crate::dto::user_dto::{
    EnterpriseProfilePayload, JobIntentionPayload, UpdateStudentProfilePayload, UpdateUserPayload,
};
use crate::dto::{Page, Paginated};
use crate::error::{Error, Result};
use crate::models::actor::{Actor, Profile};
use crate::models::profile::{EnterpriseProfile, JobIntention, Resume, StudentProfile};
use crate::models::user::{Role, User, UserType};
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::{decode_token, issue_pair, issue_token, TokenKind, TokenPair};
use crate::utils::upload::{self, Upload};
use crate::utils::validation::{ensure_passwords_match, field_error};

pub const USER_COLUMNS: &str = "id, phone, email, password_hash, user_type, avatar, real_name, \
     gender, birth_date, address, is_active, is_staff, is_verified, last_login_ip, created_at, updated_at";

const STUDENT_PROFILE_COLUMNS: &str = "id, user_id, student_id, school, major, grade, \
     graduation_date, gpa, resume, skills, created_at, updated_at";

const ENTERPRISE_PROFILE_COLUMNS: &str = "id, user_id, company_name, company_code, industry, \
     company_size, company_address, company_website, company_description, business_license, \
     is_verified, created_at, updated_at";

const INTENTION_COLUMNS: &str = "id, user_id, position, salary_range, work_cities, job_type, \
     industry, company_size, other_requirements, created_at, updated_at";

const RESUME_COLUMNS: &str =
    "id, user_id, name, file, file_size, file_type, is_default, created_at, updated_at";

pub const DEFAULT_RESET_PASSWORD: &str = "123456";

/// Everything `GET /api/users/me` reports about the caller.
pub struct UserProfile {
    pub user: User,
    pub roles: Vec<Role>,
    pub student_profile: Option<StudentProfile>,
    pub enterprise_profile: Option<EnterpriseProfile>,
    pub job_intention: Option<JobIntention>,
    pub resumes: Vec<Resume>,
}

pub struct LoginContext {
    pub ip: Option<IpAddr>,
    pub user_agent: String,
}

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<User> {
        ensure_passwords_match(&payload.password, &payload.password_confirm)?;
        if payload.user_type == UserType::Admin {
            return Err(field_error(
                "user_type",
                "admin_registration",
                "Administrator accounts cannot be registered",
            ));
        }
        if self.find_by_phone(&payload.phone).await?.is_some() {
            return Err(Error::Conflict(
                "A user with this phone number already exists".into(),
            ));
        }
        if let Some(email) = payload.email.as_deref() {
            self.ensure_email_free(email, None).await?;
        }

        let password_hash = hash_password(&payload.password)?;
        let user = self
            .insert_user(
                &payload.phone,
                payload.email.as_deref(),
                &password_hash,
                payload.user_type,
                payload.real_name.as_deref().unwrap_or_default(),
                payload.gender.map(|g| g.as_str()).unwrap_or_default(),
            )
            .await?;

        tracing::info!(user_id = user.id, user_type = %user.user_type, "user registered");
        Ok(user)
    }

    /// Creates an administrator unless the phone is already taken.
    pub async fn create_superuser(&self, phone: &str, password: &str) -> Result<User> {
        if let Some(existing) = self.find_by_phone(phone).await? {
            return Ok(existing);
        }
        let password_hash = hash_password(password)?;
        let user = self
            .insert_user(phone, None, &password_hash, UserType::Admin, "", "")
            .await?;
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            SELECT $1, id FROM roles WHERE name = 'super_admin'
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user.id)
        .execute(&self.pool)
        .await?;
        tracing::info!(user_id = user.id, "administrator account created");
        Ok(user)
    }

    async fn insert_user(
        &self,
        phone: &str,
        email: Option<&str>,
        password_hash: &str,
        user_type: UserType,
        real_name: &str,
        gender: &str,
    ) -> Result<User> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            r#"
            INSERT INTO users (phone, email, password_hash, user_type, real_name, gender, is_staff)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(phone)
            .bind(email)
            .bind(password_hash)
            .bind(user_type.as_str())
            .bind(real_name)
            .bind(gender)
            .bind(user_type == UserType::Admin)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            SELECT $1, id FROM roles WHERE name = $2
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user.id)
        .bind(user_type.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    pub async fn login(
        &self,
        phone: &str,
        password: &str,
        ctx: LoginContext,
    ) -> Result<(User, TokenPair)> {
        let invalid = || Error::Unauthorized("Invalid phone or password".into());
        let user = self.find_by_phone(phone).await?.ok_or_else(invalid)?;
        let ip = ctx.ip.map(IpNetwork::from);

        if !verify_password(password, &user.password_hash) {
            self.record_login(user.id, ip, &ctx.user_agent, false, "invalid password")
                .await?;
            tracing::info!(user_id = user.id, "login rejected: bad password");
            return Err(invalid());
        }
        if !user.is_active {
            self.record_login(user.id, ip, &ctx.user_agent, false, "account disabled")
                .await?;
            return Err(Error::Unauthorized("User account is disabled".into()));
        }

        let sql = format!(
            "UPDATE users SET last_login_ip = $2 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(ip)
            .fetch_one(&self.pool)
            .await?;
        self.record_login(user.id, ip, &ctx.user_agent, true, "")
            .await?;

        let config = get_config();
        let tokens = issue_pair(
            &config.jwt_secret,
            user.id,
            &user.user_type,
            Duration::minutes(config.jwt_access_ttl_minutes),
            Duration::days(config.jwt_refresh_ttl_days),
        )?;
        tracing::info!(user_id = user.id, "user logged in");
        Ok((user, tokens))
    }

    async fn record_login(
        &self,
        user_id: i64,
        ip: Option<IpNetwork>,
        user_agent: &str,
        is_success: bool,
        failure_reason: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO login_logs (user_id, ip_address, user_agent, is_success, failure_reason)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(ip)
        .bind(user_agent)
        .bind(is_success)
        .bind(failure_reason)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let config = get_config();
        let claims = decode_token(&config.jwt_secret, refresh_token, TokenKind::Refresh)?;
        let user = self.get_user(claims.user_id()?).await?;
        if !user.is_active {
            return Err(Error::Unauthorized("User account is disabled".into()));
        }
        issue_token(
            &config.jwt_secret,
            user.id,
            &user.user_type,
            TokenKind::Access,
            Duration::minutes(config.jwt_access_ttl_minutes),
        )
    }

    /// Loads the caller and resolves their profile once for the rest of the request.
    pub async fn resolve_actor(&self, user_id: i64) -> Result<Actor> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::Unauthorized("User not found".into()))?;
        if !user.is_active {
            return Err(Error::Unauthorized("User account is disabled".into()));
        }

        let profile = match user.kind()? {
            UserType::Admin => Profile::Admin,
            UserType::Student => match self.find_student_profile(user.id).await? {
                Some(p) => Profile::Student(p),
                None => Profile::Incomplete(UserType::Student),
            },
            UserType::Enterprise => match self.find_enterprise_profile(user.id).await? {
                Some(p) => Profile::Enterprise(p),
                None => Profile::Incomplete(UserType::Enterprise),
            },
        };
        Ok(Actor::new(user, profile))
    }

    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE phone = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".into()))
    }

    async fn ensure_email_free(&self, email: &str, except_user: Option<i64>) -> Result<()> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND id <> COALESCE($2, -1))",
        )
        .bind(email)
        .bind(except_user)
        .fetch_one(&self.pool)
        .await?;
        if taken {
            return Err(field_error(
                "email",
                "email_taken",
                "This email is already in use.",
            ));
        }
        Ok(())
    }

    pub async fn roles_for(&self, user_id: i64) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.id, r.name, r.description, r.permissions, r.created_at, r.updated_at
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT id, name, description, permissions, created_at, updated_at FROM roles ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    pub async fn profile(&self, actor: &Actor) -> Result<UserProfile> {
        let user_id = actor.id();
        Ok(UserProfile {
            user: self.get_user(user_id).await?,
            roles: self.roles_for(user_id).await?,
            student_profile: self.find_student_profile(user_id).await?,
            enterprise_profile: self.find_enterprise_profile(user_id).await?,
            job_intention: self.find_job_intention(user_id).await?,
            resumes: self.list_resumes(actor).await?,
        })
    }

    pub async fn update_user(&self, actor: &Actor, payload: UpdateUserPayload) -> Result<User> {
        if let Some(email) = payload.email.as_deref() {
            self.ensure_email_free(email, Some(actor.id())).await?;
        }
        let sql = format!(
            r#"
            UPDATE users
            SET
                email = COALESCE($2, email),
                real_name = COALESCE($3, real_name),
                gender = COALESCE($4, gender),
                birth_date = COALESCE($5, birth_date),
                address = COALESCE($6, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(actor.id())
            .bind(payload.email)
            .bind(payload.real_name)
            .bind(payload.gender.map(|g| g.as_str()))
            .bind(payload.birth_date)
            .bind(payload.address)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn upload_avatar(&self, actor: &Actor, file: Upload) -> Result<User> {
        let root = &get_config().uploads_dir;
        let stored = file.save(root).await?;
        let sql = format!(
            "UPDATE users SET avatar = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let written = sqlx::query_as::<_, User>(&sql)
            .bind(actor.id())
            .bind(&stored)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::from);
        let user = upload::discard_on_error(root, &stored, written).await?;
        if let Some(old) = actor.user.avatar.as_deref() {
            if old != stored {
                upload::remove(root, old).await?;
            }
        }
        Ok(user)
    }

    pub async fn find_student_profile(&self, user_id: i64) -> Result<Option<StudentProfile>> {
        let sql = format!(
            "SELECT {} FROM student_profiles WHERE user_id = $1",
            STUDENT_PROFILE_COLUMNS
        );
        let profile = sqlx::query_as::<_, StudentProfile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    pub async fn find_enterprise_profile(&self, user_id: i64) -> Result<Option<EnterpriseProfile>> {
        let sql = format!(
            "SELECT {} FROM enterprise_profiles WHERE user_id = $1",
            ENTERPRISE_PROFILE_COLUMNS
        );
        let profile = sqlx::query_as::<_, EnterpriseProfile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    /// Admins page through every student profile; everyone else sees at most their own.
    pub async fn list_student_profiles(
        &self,
        actor: &Actor,
        page: Page,
    ) -> Result<Paginated<StudentProfile>> {
        let owner = if actor.is_staff() { None } else { Some(actor.id()) };
        let sql = format!(
            r#"
            SELECT {} FROM student_profiles
            WHERE ($1::BIGINT IS NULL OR user_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            STUDENT_PROFILE_COLUMNS
        );
        let rows = sqlx::query_as::<_, StudentProfile>(&sql)
            .bind(owner)
            .bind(page.page_size)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM student_profiles WHERE ($1::BIGINT IS NULL OR user_id = $1)",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(Paginated::new(rows, count, page))
    }

    pub async fn list_enterprise_profiles(
        &self,
        actor: &Actor,
        page: Page,
    ) -> Result<Paginated<EnterpriseProfile>> {
        let owner = if actor.is_staff() { None } else { Some(actor.id()) };
        let sql = format!(
            r#"
            SELECT {} FROM enterprise_profiles
            WHERE ($1::BIGINT IS NULL OR user_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            ENTERPRISE_PROFILE_COLUMNS
        );
        let rows = sqlx::query_as::<_, EnterpriseProfile>(&sql)
            .bind(owner)
            .bind(page.page_size)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enterprise_profiles WHERE ($1::BIGINT IS NULL OR user_id = $1)",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(Paginated::new(rows, count, page))
    }

    /// Creates the blank profile on first use, then applies the provided fields.
    pub async fn update_student_profile(
        &self,
        actor: &Actor,
        payload: UpdateStudentProfilePayload,
    ) -> Result<StudentProfile> {
        if actor.user.kind()? != UserType::Student {
            return Err(Error::Forbidden(
                "Only student users have a student profile".into(),
            ));
        }

        sqlx::query("INSERT INTO student_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(actor.id())
            .execute(&self.pool)
            .await?;

        let skills = payload
            .skills
            .map(serde_json::to_value)
            .transpose()?;
        let sql = format!(
            r#"
            UPDATE student_profiles
            SET
                student_id = COALESCE($2, student_id),
                school = COALESCE($3, school),
                major = COALESCE($4, major),
                grade = COALESCE($5, grade),
                graduation_date = COALESCE($6, graduation_date),
                gpa = COALESCE($7, gpa),
                skills = COALESCE($8, skills),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {}
            "#,
            STUDENT_PROFILE_COLUMNS
        );
        let profile = sqlx::query_as::<_, StudentProfile>(&sql)
            .bind(actor.id())
            .bind(payload.student_id)
            .bind(payload.school)
            .bind(payload.major)
            .bind(payload.grade)
            .bind(payload.graduation_date)
            .bind(payload.gpa)
            .bind(skills)
            .fetch_one(&self.pool)
            .await?;
        Ok(profile)
    }

    pub async fn upsert_enterprise_profile(
        &self,
        actor: &Actor,
        payload: EnterpriseProfilePayload,
    ) -> Result<EnterpriseProfile> {
        if actor.user.kind()? != UserType::Enterprise {
            return Err(Error::Forbidden(
                "Only enterprise users can maintain a company profile".into(),
            ));
        }
        let sql = format!(
            r#"
            INSERT INTO enterprise_profiles (
                user_id, company_name, company_code, industry, company_size,
                company_address, company_website, company_description
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                company_name = EXCLUDED.company_name,
                company_code = EXCLUDED.company_code,
                industry = EXCLUDED.industry,
                company_size = EXCLUDED.company_size,
                company_address = EXCLUDED.company_address,
                company_website = EXCLUDED.company_website,
                company_description = EXCLUDED.company_description,
                updated_at = NOW()
            RETURNING {}
            "#,
            ENTERPRISE_PROFILE_COLUMNS
        );
        let profile = sqlx::query_as::<_, EnterpriseProfile>(&sql)
            .bind(actor.id())
            .bind(payload.company_name)
            .bind(payload.company_code)
            .bind(payload.industry)
            .bind(payload.company_size)
            .bind(payload.company_address)
            .bind(payload.company_website)
            .bind(payload.company_description)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match Error::from(e) {
                Error::Conflict(_) => Error::Conflict("Company code is already registered".into()),
                other => other,
            })?;
        tracing::info!(user_id = actor.id(), company_id = profile.id, "enterprise profile saved");
        Ok(profile)
    }

    pub async fn find_job_intention(&self, user_id: i64) -> Result<Option<JobIntention>> {
        let sql = format!(
            "SELECT {} FROM job_intentions WHERE user_id = $1",
            INTENTION_COLUMNS
        );
        let intention = sqlx::query_as::<_, JobIntention>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(intention)
    }

    pub async fn job_intention(&self, actor: &Actor) -> Result<JobIntention> {
        self.find_job_intention(actor.id())
            .await?
            .ok_or_else(|| Error::NotFound("No job intention found".into()))
    }

    pub async fn put_job_intention(
        &self,
        actor: &Actor,
        payload: JobIntentionPayload,
    ) -> Result<JobIntention> {
        let sql = format!(
            r#"
            INSERT INTO job_intentions (
                user_id, position, salary_range, work_cities, job_type,
                industry, company_size, other_requirements
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                position = EXCLUDED.position,
                salary_range = EXCLUDED.salary_range,
                work_cities = EXCLUDED.work_cities,
                job_type = EXCLUDED.job_type,
                industry = EXCLUDED.industry,
                company_size = EXCLUDED.company_size,
                other_requirements = EXCLUDED.other_requirements,
                updated_at = NOW()
            RETURNING {}
            "#,
            INTENTION_COLUMNS
        );
        let intention = sqlx::query_as::<_, JobIntention>(&sql)
            .bind(actor.id())
            .bind(payload.position)
            .bind(payload.salary_range.as_str())
            .bind(serde_json::to_value(payload.work_cities)?)
            .bind(payload.job_type.as_str())
            .bind(payload.industry)
            .bind(payload.company_size)
            .bind(payload.other_requirements)
            .fetch_one(&self.pool)
            .await?;
        Ok(intention)
    }

    pub async fn list_resumes(&self, actor: &Actor) -> Result<Vec<Resume>> {
        let sql = format!(
            "SELECT {} FROM resumes WHERE user_id = $1 ORDER BY is_default DESC, created_at DESC",
            RESUME_COLUMNS
        );
        let rows = sqlx::query_as::<_, Resume>(&sql)
            .bind(actor.id())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_resume(&self, actor: &Actor, id: i64) -> Result<Resume> {
        let sql = format!(
            "SELECT {} FROM resumes WHERE id = $1 AND user_id = $2",
            RESUME_COLUMNS
        );
        sqlx::query_as::<_, Resume>(&sql)
            .bind(id)
            .bind(actor.id())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Resume not found".into()))
    }

    /// Stores the file and the row; a new default clears the flag on the user's other resumes.
    pub async fn upload_resume(
        &self,
        actor: &Actor,
        name: Option<String>,
        is_default: bool,
        file: Upload,
    ) -> Result<Resume> {
        let root = &get_config().uploads_dir;
        let stored = file.save(root).await?;
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| file.original_name.clone());

        let written = self
            .insert_resume(actor.id(), name, is_default, &stored, &file)
            .await;
        let resume = upload::discard_on_error(root, &stored, written).await?;

        tracing::info!(user_id = actor.id(), resume_id = resume.id, "resume uploaded");
        Ok(resume)
    }

    async fn insert_resume(
        &self,
        user_id: i64,
        name: String,
        is_default: bool,
        stored: &str,
        file: &Upload,
    ) -> Result<Resume> {
        let mut tx = self.pool.begin().await?;
        if is_default {
            sqlx::query("UPDATE resumes SET is_default = FALSE, updated_at = NOW() WHERE user_id = $1 AND is_default")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }
        let sql = format!(
            r#"
            INSERT INTO resumes (user_id, name, file, file_size, file_type, is_default)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            RESUME_COLUMNS
        );
        let resume = sqlx::query_as::<_, Resume>(&sql)
            .bind(user_id)
            .bind(name)
            .bind(stored)
            .bind(file.size())
            .bind(&file.extension)
            .bind(is_default)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(resume)
    }

    pub async fn delete_resume(&self, actor: &Actor, id: i64) -> Result<()> {
        let resume = self.get_resume(actor, id).await?;
        sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(resume.id)
            .execute(&self.pool)
            .await?;
        upload::remove(&get_config().uploads_dir, &resume.file).await?;
        Ok(())
    }

    pub async fn admin_list_users(&self, query: AdminUserQuery) -> Result<Paginated<User>> {
        let page = Page::new(query.page, query.page_size);

        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM users WHERE TRUE");
        push_user_filters(&mut count_qb, &query);
        let count = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM users WHERE TRUE", USER_COLUMNS));
        push_user_filters(&mut qb, &query);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.page_size)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let users = qb.build_query_as::<User>().fetch_all(&self.pool).await?;

        Ok(Paginated::new(users, count, page))
    }

    pub async fn toggle_active(&self, id: i64) -> Result<User> {
        let sql = format!(
            "UPDATE users SET is_active = NOT is_active, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".into()))?;
        tracing::info!(user_id = user.id, is_active = user.is_active, "user status toggled");
        Ok(user)
    }

    pub async fn reset_password(&self, id: i64, new_password: Option<&str>) -> Result<()> {
        let password_hash = hash_password(new_password.unwrap_or(DEFAULT_RESET_PASSWORD))?;
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("User not found".into()));
        }
        tracing::info!(user_id = id, "password reset by administrator");
        Ok(())
    }
}

fn push_user_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &AdminUserQuery) {
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        qb.push(" AND (real_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR phone ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(user_type) = query.user_type.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND user_type = ").push_bind(user_type.to_string());
    }
    if let Some(is_active) = query.is_active {
        qb.push(" AND is_active = ").push_bind(is_active);
    }
}
