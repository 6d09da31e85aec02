use serde::{Deserialize, Serialize};
use crate::simulator::{AgentStats, DataSource, JobStatus};

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub query: String,
    /// Skip the backend even when one is configured.
    #[serde(default)]
    pub demo: bool,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub job_id: String,
    pub query: String,
    pub status: JobStatus,
    pub source: DataSource,
    pub overall_progress: u8,
    pub live: bool,
    pub connection_error: Option<String>,
}

impl SessionSummary {
    pub fn new(id: &str, snapshot: &crate::simulator::JobSnapshot, stats: &AgentStats, live: bool) -> Self {
        Self {
            id: id.to_string(),
            job_id: snapshot.job_id.clone(),
            query: snapshot.query.clone(),
            status: snapshot.status,
            source: snapshot.source,
            overall_progress: stats.overall_progress,
            live,
            connection_error: snapshot.connection_error.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub theme: Option<String>,
    pub notifications: Option<bool>,
    pub auto_refresh: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContextUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
}
