use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::agents::AgentName;

pub const INITIAL_TASK: &str = "Waiting for initialization...";
pub const QUEUED_TASK: &str = "Queued for execution...";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Idle,
    Pending,
    Running,
    Completed,
    Error,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// Parse a backend state string. `failed` is reported by some backends
    /// for what the dashboard calls `error`.
    pub fn parse(state: &str) -> Option<Self> {
        match state.trim().to_ascii_lowercase().as_str() {
            "idle" => Some(Self::Idle),
            "pending" | "queued" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "error" | "failed" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub name: AgentName,
    pub status: AgentStatus,
    pub task: String,
    pub progress: u8,
    pub start_delay_ms: u64,
    /// Sampled once per session; never re-drawn on later ticks.
    pub target_duration_ms: u64,
}

impl Agent {
    pub fn is_completed(&self) -> bool {
        self.status == AgentStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Initializing,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(status: &str) -> Option<Self> {
        match status.trim().to_ascii_lowercase().as_str() {
            "initializing" | "pending" | "queued" => Some(Self::Initializing),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the agent model is coming from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Local timer-driven simulation.
    Demo,
    /// Reconciled from backend status polls.
    Backend,
}

/// Everything a renderer needs about one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job_id: String,
    pub query: String,
    pub status: JobStatus,
    pub source: DataSource,
    pub agents: Vec<Agent>,
    pub connection_error: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl JobSnapshot {
    pub fn new(job_id: &str, query: &str, source: DataSource, agents: Vec<Agent>) -> Self {
        Self {
            job_id: job_id.to_string(),
            query: query.to_string(),
            status: JobStatus::Initializing,
            source,
            agents,
            connection_error: None,
            started_at: Utc::now(),
        }
    }

    /// Job status as implied by the agent list. Once every agent has
    /// finished and at least one of them is in error, the job has failed.
    pub fn derived_status(agents: &[Agent], current: JobStatus) -> JobStatus {
        let all_finished = !agents.is_empty()
            && agents
                .iter()
                .all(|a| matches!(a.status, AgentStatus::Completed | AgentStatus::Error));
        if all_finished && agents.iter().all(Agent::is_completed) {
            JobStatus::Completed
        } else if all_finished {
            JobStatus::Failed
        } else if current == JobStatus::Initializing {
            JobStatus::Initializing
        } else if current == JobStatus::Failed {
            JobStatus::Failed
        } else {
            JobStatus::Running
        }
    }

    /// Replace the agent list and re-derive the job status from it.
    pub fn replace_agents(&mut self, agents: Vec<Agent>) {
        self.status = Self::derived_status(&agents, self.status);
        self.agents = agents;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(name: AgentName, status: AgentStatus, progress: u8) -> Agent {
        Agent {
            name,
            status,
            task: String::new(),
            progress,
            start_delay_ms: 0,
            target_duration_ms: 20_000,
        }
    }

    #[test]
    fn test_agent_status_parse() {
        assert_eq!(AgentStatus::parse("Completed"), Some(AgentStatus::Completed));
        assert_eq!(AgentStatus::parse("failed"), Some(AgentStatus::Error));
        assert_eq!(AgentStatus::parse("bogus"), None);
    }

    #[test]
    fn test_job_status_parse_maps_pending_to_initializing() {
        assert_eq!(JobStatus::parse("pending"), Some(JobStatus::Initializing));
        assert_eq!(JobStatus::parse("RUNNING"), Some(JobStatus::Running));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&AgentStatus::Running).unwrap(), "\"running\"");
        assert_eq!(serde_json::to_string(&JobStatus::Initializing).unwrap(), "\"initializing\"");
    }

    #[test]
    fn test_derived_status_completed_only_when_all_done() {
        let partial = vec![
            agent(AgentName::Clinical, AgentStatus::Completed, 100),
            agent(AgentName::Genomics, AgentStatus::Running, 50),
        ];
        assert_eq!(JobSnapshot::derived_status(&partial, JobStatus::Running), JobStatus::Running);

        let done = vec![
            agent(AgentName::Clinical, AgentStatus::Completed, 100),
            agent(AgentName::Genomics, AgentStatus::Completed, 100),
        ];
        assert_eq!(JobSnapshot::derived_status(&done, JobStatus::Running), JobStatus::Completed);
    }

    #[test]
    fn test_derived_status_empty_never_completes() {
        assert_eq!(JobSnapshot::derived_status(&[], JobStatus::Running), JobStatus::Running);
    }

    #[test]
    fn test_derived_status_error_fails_only_when_all_finished() {
        let running = vec![
            agent(AgentName::Clinical, AgentStatus::Error, 40),
            agent(AgentName::Genomics, AgentStatus::Running, 50),
        ];
        assert_eq!(JobSnapshot::derived_status(&running, JobStatus::Running), JobStatus::Running);

        let finished = vec![
            agent(AgentName::Clinical, AgentStatus::Error, 40),
            agent(AgentName::Genomics, AgentStatus::Completed, 100),
        ];
        assert_eq!(JobSnapshot::derived_status(&finished, JobStatus::Running), JobStatus::Failed);
    }
}
