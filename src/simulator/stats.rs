use serde::Serialize;
use super::state::{Agent, AgentStatus};

/// Derived view over an agent list. Recomputed on every change, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct AgentStats {
    pub total: usize,
    pub idle: usize,
    pub pending: usize,
    pub running: usize,
    pub completed: usize,
    pub error: usize,
    pub overall_progress: u8,
    pub all_completed: bool,
}

impl AgentStats {
    pub fn compute(agents: &[Agent]) -> Self {
        let count = |status: AgentStatus| agents.iter().filter(|a| a.status == status).count();
        let total = agents.len();
        let completed = count(AgentStatus::Completed);

        let overall_progress = if total == 0 {
            0
        } else {
            let sum: u32 = agents.iter().map(|a| a.progress as u32).sum();
            (sum as f64 / total as f64).round() as u8
        };

        Self {
            total,
            idle: count(AgentStatus::Idle),
            pending: count(AgentStatus::Pending),
            running: count(AgentStatus::Running),
            completed,
            error: count(AgentStatus::Error),
            overall_progress,
            all_completed: total > 0 && completed == total,
        }
    }

    /// Agents that have not started yet, idle or queued.
    pub fn waiting(&self) -> usize {
        self.idle + self.pending
    }
}
