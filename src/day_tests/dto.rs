use serde::Deserialize;
use serde_json::Value;

use crate::patch::Patch;

#[derive(Debug, Deserialize)]
pub struct CreateDayTestRequest {
    pub date: Option<String>,
    #[serde(alias = "testResults")]
    pub test_results: Option<Value>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDayTestRequest {
    #[serde(default)]
    pub date: Patch<String>,
    #[serde(default, alias = "testResults")]
    pub test_results: Patch<Value>,
    #[serde(default)]
    pub notes: Patch<String>,
}
