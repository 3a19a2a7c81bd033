//! Request and response bodies.

use clipboardai_storage::HistorySummary;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ProcessRequest {
    /// Template variables; non-string values use their JSON text.
    pub fn vars(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub result: Option<String>,
    pub tokens_used: u64,
    pub action: String,
    pub history_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionInfo {
    pub name: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionsResponse {
    pub actions: Vec<ActionInfo>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
    pub action: Option<String>,
}

fn default_history_limit() -> usize {
    50
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistorySummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_requests: u64,
    pub total_tokens: u64,
    pub estimated_cost: f64,
    pub actions_by_type: BTreeMap<String, u64>,
    pub history_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PromptResponse {
    pub action: String,
    pub system_prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePromptRequest {
    #[serde(default)]
    pub system_prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub ai_enabled: bool,
    pub provider: Option<String>,
    pub model: Option<String>,
}
