pub mod state;
pub mod engine;
pub mod reconcile;
pub mod stats;
pub mod activity;

pub use state::{Agent, AgentStatus, DataSource, JobSnapshot, JobStatus};
pub use engine::{AgentSimulator, SimulationConfig, MAX_JITTER};
pub use reconcile::{apply_status_response, reconcile_agents};
pub use stats::AgentStats;
pub use activity::{ActivityFeed, ActivityLine};
