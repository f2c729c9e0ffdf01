use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WordFocused {
    pub id: Uuid,
    pub word: String,
    pub meaning: String,
    pub remembered: bool,
    pub metadata_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewWordFocused {
    pub word: String,
    pub meaning: String,
    pub remembered: bool,
}
