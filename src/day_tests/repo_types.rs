use serde::{Serialize, Serializer};
use sqlx::FromRow;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};
use uuid::Uuid;

pub(crate) const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DayTest {
    pub id: Uuid,
    #[serde(serialize_with = "serialize_date")]
    pub date: Date,
    pub test_results: serde_json::Value,
    pub notes: Option<String>,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewDayTest {
    pub date: Date,
    pub test_results: serde_json::Value,
    pub notes: Option<String>,
}

fn serialize_date<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    let text = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}
