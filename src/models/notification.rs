use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

text_enum!(NotificationType {
    System => "system",
    Job => "job",
    Application => "application",
    Interview => "interview",
    Feedback => "feedback",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SystemNotification {
    pub id: i64,
    pub recipient_id: i64,
    pub title: String,
    pub content: String,
    pub notification_type: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub related_object_id: Option<i64>,
    pub related_object_type: String,
    pub created_at: DateTime<Utc>,
}

/// A notification waiting to be stored.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: i64,
    pub title: String,
    pub content: String,
    pub notification_type: NotificationType,
    pub related_object_id: Option<i64>,
    pub related_object_type: String,
}
