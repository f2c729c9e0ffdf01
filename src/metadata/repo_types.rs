use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Metadata {
    pub id: Uuid,
    pub subject: String,
    pub level: Option<String>,
    pub time_spent: Option<i32>, // minutes
    pub notes: Option<String>,
    pub file_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewMetadata {
    pub subject: String,
    pub level: Option<String>,
    pub time_spent: Option<i32>,
    pub notes: Option<String>,
}
