use serde::{Deserialize, Serialize};
use super::null_as_empty;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobOptions {
    pub max_candidates: u32,
    pub run_agents: Vec<String>,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            max_candidates: 10,
            run_agents: ["clinical", "genomics", "safety", "patent"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Body of `POST /api/v1/jobs/query`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub databases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<JobOptions>,
}

impl CreateJobRequest {
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            databases: Some(vec!["clinical".into(), "patents".into(), "genomic".into()]),
            options: Some(JobOptions::default()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub job_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// One entry of `perAgentStatus`. Everything except the name may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentStatusRecord {
    pub agent: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub task: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub per_agent_status: Vec<AgentStatusRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_wire_shape() {
        let req = CreateJobRequest::new("Find kinase inhibitors for Alzheimer's disease");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["prompt"], "Find kinase inhibitors for Alzheimer's disease");
        assert_eq!(json["options"]["maxCandidates"], 10);
        assert_eq!(json["options"]["runAgents"][0], "clinical");
        assert_eq!(json["databases"][1], "patents");
    }

    #[test]
    fn test_status_response_tolerates_partial_entries() {
        let raw = r#"{
            "status": "running",
            "percentComplete": 33,
            "perAgentStatus": [
                {"agent": "Clinical", "state": "running", "progress": 40, "task": "Querying"},
                {"agent": "Genomics", "state": "pending", "startedAt": null}
            ]
        }"#;
        let parsed: JobStatusResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status.as_deref(), Some("running"));
        assert_eq!(parsed.per_agent_status.len(), 2);
        assert_eq!(parsed.per_agent_status[0].progress, Some(40.0));
        assert!(parsed.per_agent_status[1].progress.is_none());
        assert!(parsed.per_agent_status[1].task.is_none());
    }

    #[test]
    fn test_status_response_null_agent_list() {
        let parsed: JobStatusResponse = serde_json::from_str(r#"{"status": "running", "perAgentStatus": null}"#).unwrap();
        assert!(parsed.per_agent_status.is_empty());

        let parsed: JobStatusResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.status.is_none());
    }

    #[test]
    fn test_create_response_reads_job_id() {
        let parsed: CreateJobResponse = serde_json::from_str(r#"{"jobId": "abc-123", "status": "pending"}"#).unwrap();
        assert_eq!(parsed.job_id, "abc-123");
    }
}
