use serde::Deserialize;

use crate::patch::Patch;

#[derive(Debug, Deserialize)]
pub struct CreateWordRequest {
    pub word: Option<String>,
    pub meaning: Option<String>,
    pub remembered: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateWordRequest {
    #[serde(default)]
    pub word: Patch<String>,
    #[serde(default)]
    pub meaning: Patch<String>,
    #[serde(default)]
    pub remembered: Patch<bool>,
}
