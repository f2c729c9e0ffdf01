use serde::Deserialize;

use crate::patch::Patch;

#[derive(Debug, Deserialize)]
pub struct CreateMetadataRequest {
    pub subject: Option<String>,
    pub level: Option<String>,
    #[serde(alias = "timeSpent", alias = "timePassed")]
    pub time_spent: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMetadataRequest {
    #[serde(default)]
    pub subject: Patch<String>,
    #[serde(default)]
    pub level: Patch<String>,
    #[serde(default, alias = "timeSpent", alias = "timePassed")]
    pub time_spent: Patch<i32>,
    #[serde(default)]
    pub notes: Patch<String>,
}
