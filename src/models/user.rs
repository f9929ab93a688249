use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::types::ipnetwork::IpNetwork;
use sqlx::FromRow;

use crate::error::Result;

text_enum!(UserType {
    Student => "student",
    Enterprise => "enterprise",
    Admin => "admin",
});

text_enum!(Gender {
    Male => "M",
    Female => "F",
    Other => "O",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub phone: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub user_type: String,
    pub avatar: Option<String>,
    pub real_name: String,
    pub gender: String,
    pub birth_date: Option<NaiveDate>,
    pub address: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_verified: bool,
    pub last_login_ip: Option<IpNetwork>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn kind(&self) -> Result<UserType> {
        self.user_type.parse()
    }

    /// Name shown to other parties; falls back to the phone number.
    pub fn display_name(&self) -> &str {
        if self.real_name.is_empty() {
            &self.phone
        } else {
            &self.real_name
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub permissions: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoginLog {
    pub id: i64,
    pub user_id: i64,
    pub ip_address: Option<IpNetwork>,
    pub user_agent: String,
    pub login_time: DateTime<Utc>,
    pub is_success: bool,
    pub failure_reason: String,
}
