pub mod registry;

pub use registry::{AgentDefinition, AgentName, AGENT_REGISTRY};
