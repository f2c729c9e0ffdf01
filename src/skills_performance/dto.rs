use serde::Deserialize;

use crate::patch::Patch;

/// `performance` stays a string here so an unknown level surfaces as a
/// validation error instead of a body rejection.
#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    pub skill: Option<String>,
    pub performance: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSkillRequest {
    #[serde(default)]
    pub skill: Patch<String>,
    #[serde(default)]
    pub performance: Patch<String>,
}
