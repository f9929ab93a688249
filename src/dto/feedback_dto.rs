use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::models::feedback::{
    Feedback, FeedbackCategory, FeedbackListing, FeedbackPriority, FeedbackReply,
};
use crate::models::notification::SystemNotification;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFeedbackPayload {
    pub category_id: Option<i64>,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 11))]
    pub contact_phone: String,
    #[serde(default)]
    #[validate(length(max = 254))]
    pub contact_email: String,
    pub priority: Option<FeedbackPriority>,
}

/// Content is checked in the service so that blank input reports a plain error.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReplyPayload {
    pub content: Option<String>,
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MarkReadPayload {
    pub notification_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackCategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub sort_order: i32,
}

impl From<FeedbackCategory> for FeedbackCategoryResponse {
    fn from(value: FeedbackCategory) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            sort_order: value.sort_order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSummaryResponse {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub title: String,
    pub priority: String,
    pub status: String,
    pub admin_reply: String,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<FeedbackListing> for FeedbackSummaryResponse {
    fn from(value: FeedbackListing) -> Self {
        let fb = value.feedback;
        Self {
            id: fb.id,
            user_id: fb.user_id,
            user_name: value.user_name,
            category_id: fb.category_id,
            category_name: value.category_name,
            title: fb.title,
            priority: fb.priority,
            status: fb.status,
            admin_reply: fb.admin_reply,
            reply_count: value.reply_count,
            created_at: fb.created_at,
            updated_at: fb.updated_at,
            resolved_at: fb.resolved_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReplyResponse {
    pub id: i64,
    pub feedback_id: i64,
    pub user_id: i64,
    pub content: String,
    pub attachments: JsonValue,
    pub is_admin_reply: bool,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackReply> for FeedbackReplyResponse {
    fn from(value: FeedbackReply) -> Self {
        Self {
            id: value.id,
            feedback_id: value.feedback_id,
            user_id: value.user_id,
            content: value.content,
            attachments: value.attachments,
            is_admin_reply: value.is_admin_reply,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackDetailResponse {
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
    pub replies: Vec<FeedbackReplyResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl FeedbackDetailResponse {
    pub fn new(feedback: Feedback, replies: Vec<FeedbackReply>) -> Self {
        Self {
            id: feedback.id,
            user_id: feedback.user_id,
            category_id: feedback.category_id,
            title: feedback.title,
            content: feedback.content,
            attachments: feedback.attachments,
            contact_phone: feedback.contact_phone,
            contact_email: feedback.contact_email,
            priority: feedback.priority,
            status: feedback.status,
            assigned_to: feedback.assigned_to,
            admin_reply: feedback.admin_reply,
            resolution: feedback.resolution,
            replies: replies.into_iter().map(Into::into).collect(),
            created_at: feedback.created_at,
            updated_at: feedback.updated_at,
            resolved_at: feedback.resolved_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub notification_type: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub related_object_id: Option<i64>,
    pub related_object_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<SystemNotification> for NotificationResponse {
    fn from(value: SystemNotification) -> Self {
        Self {
            id: value.id,
            title: value.title,
            content: value.content,
            notification_type: value.notification_type,
            is_read: value.is_read,
            read_at: value.read_at,
            related_object_id: value.related_object_id,
            related_object_type: value.related_object_type,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub message: String,
    pub count: i64,
}
