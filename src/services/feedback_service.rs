use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::dto::admin_dto::AdminFeedbackQuery;
use crate::dto::feedback_dto::CreateFeedbackPayload;
use crate::dto::{Page, Paginated};
use crate::error::{Error, Result};
use crate::models::actor::Actor;
use crate::models::feedback::{
    Feedback, FeedbackCategory, FeedbackListing, FeedbackPriority, FeedbackReply, FeedbackStatus,
};
use crate::models::notification::{NewNotification, NotificationType};
use crate::services::notification_service::NotificationService;
use crate::utils::validation::field_error;

const FEEDBACK_COLUMNS: &str = "id, user_id, category_id, title, content, attachments, \
     contact_phone, contact_email, priority, status, assigned_to, admin_reply, resolution, \
     created_at, updated_at, resolved_at";

const LISTING_SELECT: &str = r#"
    SELECT
        f.id, f.user_id, f.category_id, f.title, f.content, f.attachments, f.contact_phone,
        f.contact_email, f.priority, f.status, f.assigned_to, f.admin_reply, f.resolution,
        f.created_at, f.updated_at, f.resolved_at,
        cat.name AS category_name,
        CASE WHEN u.real_name = '' THEN u.phone ELSE u.real_name END AS user_name,
        (SELECT COUNT(*) FROM feedback_replies r WHERE r.feedback_id = f.id) AS reply_count
    FROM feedbacks f
    JOIN users u ON u.id = f.user_id
    LEFT JOIN feedback_categories cat ON cat.id = f.category_id
"#;

const REPLY_COLUMNS: &str =
    "id, feedback_id, user_id, content, attachments, is_admin_reply, created_at";

#[derive(Clone)]
pub struct FeedbackService {
    pool: PgPool,
}

impl FeedbackService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn categories(&self) -> Result<Vec<FeedbackCategory>> {
        let rows = sqlx::query_as::<_, FeedbackCategory>(
            r#"
            SELECT id, name, description, sort_order, is_active, created_at
            FROM feedback_categories
            WHERE is_active
            ORDER BY sort_order, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn submit(&self, actor: &Actor, payload: CreateFeedbackPayload) -> Result<Feedback> {
        if let Some(category_id) = payload.category_id {
            let active = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM feedback_categories WHERE id = $1 AND is_active)",
            )
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;
            if !active {
                return Err(field_error(
                    "category_id",
                    "invalid_category",
                    "Feedback category does not exist or is inactive",
                ));
            }
        }

        let sql = format!(
            r#"
            INSERT INTO feedbacks (
                user_id, category_id, title, content, attachments, contact_phone,
                contact_email, priority
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            FEEDBACK_COLUMNS
        );
        let feedback = sqlx::query_as::<_, Feedback>(&sql)
            .bind(actor.id())
            .bind(payload.category_id)
            .bind(&payload.title)
            .bind(&payload.content)
            .bind(serde_json::to_value(&payload.attachments)?)
            .bind(&payload.contact_phone)
            .bind(&payload.contact_email)
            .bind(payload.priority.unwrap_or(FeedbackPriority::Medium).as_str())
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(feedback_id = feedback.id, user_id = actor.id(), "feedback submitted");
        Ok(feedback)
    }

    pub async fn mine(&self, actor: &Actor) -> Result<Vec<FeedbackListing>> {
        let sql = format!(
            "{} WHERE f.user_id = $1 ORDER BY f.created_at DESC, f.id DESC",
            LISTING_SELECT
        );
        let rows = sqlx::query_as::<_, FeedbackListing>(&sql)
            .bind(actor.id())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_feedback(&self, id: i64) -> Result<Feedback> {
        let sql = format!("SELECT {} FROM feedbacks WHERE id = $1", FEEDBACK_COLUMNS);
        sqlx::query_as::<_, Feedback>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Feedback not found".into()))
    }

    pub async fn replies(&self, feedback_id: i64) -> Result<Vec<FeedbackReply>> {
        let sql = format!(
            "SELECT {} FROM feedback_replies WHERE feedback_id = $1 ORDER BY created_at ASC, id ASC",
            REPLY_COLUMNS
        );
        let rows = sqlx::query_as::<_, FeedbackReply>(&sql)
            .bind(feedback_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Owner view with the reply thread. Other users' feedback is reported as missing.
    pub async fn detail(&self, actor: &Actor, id: i64) -> Result<(Feedback, Vec<FeedbackReply>)> {
        let feedback = self.get_feedback(id).await?;
        if feedback.user_id != actor.id() && !actor.is_staff() {
            return Err(Error::NotFound("Feedback not found".into()));
        }
        let replies = self.replies(id).await?;
        Ok((feedback, replies))
    }

    /// Adds to the thread. A staff reply also resolves the feedback.
    pub async fn reply(
        &self,
        actor: &Actor,
        id: i64,
        content: Option<String>,
        attachments: Vec<String>,
    ) -> Result<FeedbackReply> {
        let content = content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(field_error(
                "content",
                "required",
                "Reply content cannot be empty",
            ));
        }
        let feedback = self.get_feedback(id).await?;
        let is_staff = actor.is_staff();
        if !is_staff && feedback.user_id != actor.id() {
            return Err(Error::Forbidden(
                "You can only reply to your own feedback".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let sql = format!(
            r#"
            INSERT INTO feedback_replies (feedback_id, user_id, content, attachments, is_admin_reply)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            REPLY_COLUMNS
        );
        let reply = sqlx::query_as::<_, FeedbackReply>(&sql)
            .bind(id)
            .bind(actor.id())
            .bind(&content)
            .bind(serde_json::to_value(&attachments)?)
            .bind(is_staff)
            .fetch_one(&mut *tx)
            .await?;

        if is_staff {
            sqlx::query(
                r#"
                UPDATE feedbacks
                SET status = 'resolved', resolved_at = NOW(), updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::info!(feedback_id = id, reply_id = reply.id, is_staff, "feedback reply added");
        Ok(reply)
    }

    pub async fn admin_list(&self, query: AdminFeedbackQuery) -> Result<Paginated<FeedbackListing>> {
        let page = Page::new(query.page, query.page_size);

        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM feedbacks f WHERE TRUE");
        push_feedback_filters(&mut count_qb, &query);
        let count = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(LISTING_SELECT);
        qb.push(" WHERE TRUE");
        push_feedback_filters(&mut qb, &query);
        qb.push(" ORDER BY f.created_at DESC, f.id DESC LIMIT ")
            .push_bind(page.page_size)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let rows = qb
            .build_query_as::<FeedbackListing>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Paginated::new(rows, count, page))
    }

    /// Stores the official answer, resolves the feedback and notifies its author once.
    pub async fn admin_reply(&self, actor: &Actor, id: i64, reply: Option<String>) -> Result<Feedback> {
        let reply = reply.unwrap_or_default();
        if reply.trim().is_empty() {
            return Err(field_error("reply", "required", "Reply content cannot be empty"));
        }

        let mut tx = self.pool.begin().await?;
        let sql = format!(
            r#"
            UPDATE feedbacks
            SET
                admin_reply = $2,
                status = 'resolved',
                assigned_to = $3,
                resolved_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            FEEDBACK_COLUMNS
        );
        let feedback = sqlx::query_as::<_, Feedback>(&sql)
            .bind(id)
            .bind(&reply)
            .bind(actor.id())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::NotFound("Feedback not found".into()))?;

        NotificationService::insert(
            &mut *tx,
            &NewNotification {
                recipient_id: feedback.user_id,
                title: "Your feedback has been answered".to_string(),
                content: format!(
                    "An administrator replied to \"{}\": {}",
                    feedback.title, reply
                ),
                notification_type: NotificationType::Feedback,
                related_object_id: Some(feedback.id),
                related_object_type: "feedback".to_string(),
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!(feedback_id = id, admin_id = actor.id(), "feedback answered");
        Ok(feedback)
    }

    pub async fn admin_change_status(&self, id: i64, raw_status: &str) -> Result<Feedback> {
        let status: FeedbackStatus = raw_status.parse()?;
        let sql = format!(
            r#"
            UPDATE feedbacks
            SET
                status = $2,
                resolved_at = CASE WHEN $2 = 'resolved' THEN NOW() ELSE resolved_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            FEEDBACK_COLUMNS
        );
        let feedback = sqlx::query_as::<_, Feedback>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Feedback not found".into()))?;

        tracing::info!(feedback_id = id, status = %status, "feedback status changed");
        Ok(feedback)
    }
}

fn push_feedback_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &AdminFeedbackQuery) {
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND f.status = ").push_bind(status.to_string());
    }
    if let Some(category) = query.category {
        qb.push(" AND f.category_id = ").push_bind(category);
    }
}
