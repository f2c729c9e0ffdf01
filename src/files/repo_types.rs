use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A study file. `content` is kept verbatim.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct File {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub folder_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
