use std::collections::{HashMap, VecDeque};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use crate::agents::AgentName;
use super::state::{Agent, AgentStatus};

pub const MAX_ACTIVITY_LINES: usize = 30;

const STARTUP_LINES: &[&str] = &[
    "[SYSTEM] Initializing master agent orchestrator...",
    "[SYSTEM] Connected to knowledge graph store",
    "[SYSTEM] Loading agent configurations...",
    "[SYSTEM] Establishing agent communication channels...",
    "[SYSTEM] Agent swarm initialization complete",
];

const SYSTEM_LINES: &[&str] = &[
    "[SYSTEM] Job queue processing: 3 jobs active",
    "[SYSTEM] Agent mesh network latency: 45ms",
    "[WARN] Rate limit approaching for PubMed API (90% quota)",
    "[INFO] Caching enabled for repeated queries",
    "[INFO] Vector similarity search performance: 120ms avg",
    "[SUCCESS] Agent synchronization checkpoint reached",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityLine {
    pub at: DateTime<Utc>,
    /// `system` or the lowercase agent name.
    pub source: String,
    pub text: String,
}

/// Bounded feed of orchestration log lines derived from the agent list.
///
/// The feed only reads agents; it never writes to them.
pub struct ActivityFeed {
    lines: VecDeque<ActivityLine>,
    cursors: HashMap<AgentName, usize>,
    rng: Box<dyn RngCore + Send>,
}

impl ActivityFeed {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        let mut feed = Self {
            lines: VecDeque::with_capacity(MAX_ACTIVITY_LINES),
            cursors: HashMap::new(),
            rng: Box::new(rng),
        };
        for line in STARTUP_LINES {
            feed.push("system", line.to_string());
        }
        feed
    }

    /// Look at the current agents and append at most one new line.
    pub fn observe(&mut self, agents: &[Agent]) -> Option<ActivityLine> {
        let active: Vec<&Agent> = agents
            .iter()
            .filter(|a| matches!(a.status, AgentStatus::Running | AgentStatus::Completed))
            .collect();

        if !active.is_empty() {
            let agent = active[self.rng.gen_range(0..active.len())];
            let def = agent.name.definition();
            let len = def.phases.len();
            if len == 0 {
                return None;
            }

            let idx = if agent.status == AgentStatus::Completed {
                len - 1
            } else {
                let bucket = ((agent.progress as f64 / 100.0) * (len - 1) as f64).floor() as usize;
                bucket.min(len.saturating_sub(2))
            };

            let is_new = self.cursors.get(&agent.name).map_or(true, |seen| idx > *seen);
            if !is_new {
                return None;
            }
            self.cursors.insert(agent.name, idx);

            let text = if idx == len - 1 && agent.status == AgentStatus::Completed {
                format!("[{}] ✓ {}", def.log_tag, def.phases[idx])
            } else {
                format!("[{}] {}", def.log_tag, def.phases[idx])
            };
            return Some(self.push(&agent.name.as_str().to_lowercase(), text));
        }

        let all_waiting = !agents.is_empty()
            && agents.iter().all(|a| matches!(a.status, AgentStatus::Idle | AgentStatus::Pending));
        if all_waiting {
            let text = SYSTEM_LINES[self.rng.gen_range(0..SYSTEM_LINES.len())];
            return Some(self.push("system", text.to_string()));
        }

        None
    }

    fn push(&mut self, source: &str, text: String) -> ActivityLine {
        let line = ActivityLine {
            at: Utc::now(),
            source: source.to_string(),
            text,
        };
        if self.lines.len() == MAX_ACTIVITY_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line.clone());
        line
    }

    pub fn lines(&self) -> Vec<ActivityLine> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new()
    }
}
