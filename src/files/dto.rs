use serde::Deserialize;

use crate::patch::Patch;

#[derive(Debug, Deserialize)]
pub struct CreateFileRequest {
    pub name: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateFileRequest {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub content: Patch<String>,
}
