use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a finished job, kept in local history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHistoryEntry {
    pub id: String,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub candidates_count: u32,
    pub status: String,
}

impl JobHistoryEntry {
    pub fn completed(job_id: &str, query: &str, candidates_count: u32) -> Self {
        Self {
            id: job_id.to_string(),
            query: query.to_string(),
            timestamp: Utc::now(),
            candidates_count,
            status: "completed".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportHistoryEntry {
    pub id: String,
    pub job_id: String,
    pub format: String,
    pub timestamp: DateTime<Utc>,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_jobs: usize,
    pub total_exports: usize,
    pub recent_activity: Option<DateTime<Utc>>,
    pub most_exported_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub theme: String,
    pub notifications: bool,
    pub auto_refresh: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            notifications: true,
            auto_refresh: true,
        }
    }
}
