use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

text_enum!(FeedbackStatus {
    Pending => "pending",
    Processing => "processing",
    Resolved => "resolved",
    Closed => "closed",
});

text_enum!(FeedbackPriority {
    Low => "low",
    Medium => "medium",
    High => "high",
    Urgent => "urgent",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedbackCategory {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub attachments: JsonValue,
    pub contact_phone: String,
    pub contact_email: String,
    pub priority: String,
    pub status: String,
    pub assigned_to: Option<i64>,
    pub admin_reply: String,
    pub resolution: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct FeedbackListing {
    #[sqlx(flatten)]
    pub feedback: Feedback,
    pub category_name: Option<String>,
    pub user_name: String,
    pub reply_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedbackReply {
    pub id: i64,
    pub feedback_id: i64,
    pub user_id: i64,
    pub content: String,
    pub attachments: JsonValue,
    pub is_admin_reply: bool,
    pub created_at: DateTime<Utc>,
}
