use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "performance_level")]
pub enum Performance {
    Poor,
    Average,
    Good,
}

pub const PERFORMANCE_CHOICES: &str = "Performance must be one of: Poor, Average, Good.";

impl FromStr for Performance {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Poor" => Ok(Performance::Poor),
            "Average" => Ok(Performance::Average),
            "Good" => Ok(Performance::Good),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SkillPerformance {
    pub id: Uuid,
    pub skill: String,
    pub performance: Performance,
    pub metadata_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
