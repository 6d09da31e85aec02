use crate::simulator::{Agent, ActivityLine, DataSource, JobStatus};

/// Messages sent from a running session to renderers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Session created with its initial (possibly provisional) job id
    JobStarted {
        job_id: String,
        source: DataSource,
    },
    /// A backend job id now drives the session; local ticks have stopped
    JobBound {
        job_id: String,
    },
    StatusChanged {
        status: JobStatus,
    },
    /// The agent list was replaced by a tick or a reconciliation
    AgentsUpdated {
        agents: Vec<Agent>,
    },
    Activity(ActivityLine),
    /// A backend call failed; the session keeps running
    ConnectionError {
        message: String,
    },
    ConnectionRestored,
    /// The job reached `completed` or `failed`
    JobFinished {
        job_id: String,
        status: JobStatus,
    },
}
