use crate::models::job::{AgentStatusRecord, JobStatusResponse};
use super::state::{Agent, AgentStatus, JobSnapshot, JobStatus};

/// Merge backend-reported agent state into the local list.
///
/// Matching is by case-insensitive name; agents without a backend record are
/// returned unchanged. A `completed` result always carries progress 100, and
/// progress never moves backwards.
pub fn reconcile_agents(agents: &[Agent], records: &[AgentStatusRecord]) -> Vec<Agent> {
    agents
        .iter()
        .map(|agent| match records.iter().find(|r| agent.name.matches(&r.agent)) {
            Some(record) => merge_record(agent, record),
            None => agent.clone(),
        })
        .collect()
}

fn merge_record(agent: &Agent, record: &AgentStatusRecord) -> Agent {
    let status = record
        .state
        .as_deref()
        .and_then(AgentStatus::parse)
        .unwrap_or(agent.status);

    let task = match record.task.as_deref() {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => agent.task.clone(),
    };

    let reported = record
        .progress
        .filter(|p| p.is_finite())
        .map(|p| p.clamp(0.0, 100.0).round() as u8)
        .unwrap_or(agent.progress);

    let progress = if status == AgentStatus::Completed {
        100
    } else {
        reported.max(agent.progress)
    };

    // An agent with progress has started; it cannot go back to waiting
    let status = match status {
        AgentStatus::Idle | AgentStatus::Pending if progress > 0 => match agent.status {
            AgentStatus::Idle | AgentStatus::Pending => AgentStatus::Running,
            prior => prior,
        },
        other => other,
    };

    Agent {
        status,
        task,
        progress,
        ..agent.clone()
    }
}

/// Apply one status poll to a snapshot: agents are reconciled and the job
/// status re-derived. A backend `failed` is kept; `completed` only sticks
/// once every agent is completed.
pub fn apply_status_response(snapshot: &mut JobSnapshot, response: &JobStatusResponse) {
    let agents = reconcile_agents(&snapshot.agents, &response.per_agent_status);
    let reported = response
        .status
        .as_deref()
        .and_then(JobStatus::parse)
        .unwrap_or(snapshot.status);

    let base = match reported {
        JobStatus::Completed => JobStatus::Running,
        // A started job never returns to initializing
        JobStatus::Initializing if snapshot.status != JobStatus::Initializing => snapshot.status,
        other => other,
    };

    snapshot.status = JobSnapshot::derived_status(&agents, base);
    snapshot.agents = agents;
}
