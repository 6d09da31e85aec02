use std::time::Duration;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::debug;
use crate::agents::AgentName;
use super::state::{Agent, AgentStatus, INITIAL_TASK, QUEUED_TASK};

const DEMO_ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const FALLBACK_TASK: &str = "Processing...";

/// Largest per-tick noise accepted, in percentage points.
pub const MAX_JITTER: f64 = 100.0;

/// Timing knobs for the local simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub tick_interval: Duration,
    pub stagger: Duration,
    pub startup_delay: Duration,
    pub min_target_duration: Duration,
    pub max_target_duration: Duration,
    /// Maximum absolute per-tick noise, in percentage points.
    pub jitter: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(300),
            stagger: Duration::from_millis(500),
            startup_delay: Duration::from_millis(1000),
            min_target_duration: Duration::from_millis(15_000),
            max_target_duration: Duration::from_millis(25_000),
            jitter: 1.5,
        }
    }
}

/// Produces locally plausible agent progress.
///
/// The random source is injected so that tests can pin a seeded sequence;
/// `tick` is a pure function of the previous list, the elapsed time and the
/// generator state.
pub struct AgentSimulator {
    config: SimulationConfig,
    rng: Box<dyn RngCore + Send>,
}

impl AgentSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng<R: RngCore + Send + 'static>(config: SimulationConfig, rng: R) -> Self {
        Self { config, rng: Box::new(rng) }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Build the idle agent list with staggered start delays and a fixed
    /// target duration per agent.
    pub fn initialize(&mut self, names: &[AgentName]) -> Vec<Agent> {
        let stagger_ms = self.config.stagger.as_millis() as u64;
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Agent {
                name: *name,
                status: AgentStatus::Idle,
                task: INITIAL_TASK.to_string(),
                progress: 0,
                start_delay_ms: i as u64 * stagger_ms,
                target_duration_ms: self.sample_target_duration(),
            })
            .collect()
    }

    /// Advance every unfinished agent to `elapsed` since session start.
    pub fn tick(&mut self, agents: &[Agent], elapsed: Duration) -> Vec<Agent> {
        let elapsed_ms = elapsed.as_millis() as u64;
        agents.iter().map(|agent| self.advance(agent, elapsed_ms)).collect()
    }

    fn advance(&mut self, agent: &Agent, elapsed_ms: u64) -> Agent {
        // Backend-reported errors and finished agents are never touched
        if matches!(agent.status, AgentStatus::Completed | AgentStatus::Error) {
            return agent.clone();
        }

        if elapsed_ms < agent.start_delay_ms {
            return Agent {
                status: AgentStatus::Pending,
                task: QUEUED_TASK.to_string(),
                ..agent.clone()
            };
        }

        let runtime = elapsed_ms - agent.start_delay_ms;
        let target = agent.target_duration_ms.max(1);
        let raw = (100.0 * runtime as f64 / target as f64).min(100.0);
        let candidate = (raw + self.sample_jitter()).min(100.0);
        let mut progress = candidate.max(agent.progress as f64);

        // Past its target duration an agent finishes regardless of noise.
        if runtime >= target {
            progress = 100.0;
        }

        if progress >= 100.0 {
            let results: u32 = self.rng.gen_range(100..600);
            debug!(agent = %agent.name, runtime_ms = runtime, "Simulated agent completed");
            return Agent {
                status: AgentStatus::Completed,
                progress: 100,
                task: format!("✓ Analysis complete - {} results", results),
                ..agent.clone()
            };
        }

        let stored = (progress.round() as u8).min(99).max(agent.progress);
        let phases = agent.name.definition().phases;
        let task = phases
            .get(task_index(stored as f64, phases.len(), false))
            .copied()
            .unwrap_or(FALLBACK_TASK);

        Agent {
            status: AgentStatus::Running,
            progress: stored,
            task: task.to_string(),
            ..agent.clone()
        }
    }

    fn sample_target_duration(&mut self) -> u64 {
        let min = self.config.min_target_duration.as_millis() as u64;
        let max = self.config.max_target_duration.as_millis() as u64;
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn sample_jitter(&mut self) -> f64 {
        let jitter = self.config.jitter;
        if !jitter.is_finite() || jitter <= 0.0 {
            return 0.0;
        }
        let jitter = jitter.min(MAX_JITTER);
        self.rng.gen_range(-jitter..=jitter)
    }

    /// Locally generated job id used when no backend is reachable, e.g. `#K3Z9Q0WB`.
    pub fn demo_job_id(&mut self) -> String {
        let mut id = String::with_capacity(9);
        id.push('#');
        for _ in 0..8 {
            let idx = self.rng.gen_range(0..DEMO_ID_ALPHABET.len());
            id.push(DEMO_ID_ALPHABET[idx] as char);
        }
        id
    }
}

/// Map progress onto an ordered phase list. While the agent is not
/// completed the last phase stays reserved.
pub fn task_index(progress: f64, len: usize, completed: bool) -> usize {
    if len == 0 {
        return 0;
    }
    let bucket = ((progress / 100.0) * len as f64).floor().max(0.0) as usize;
    let idx = bucket.min(len - 1);
    if !completed && len >= 2 {
        idx.min(len - 2)
    } else {
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(config: SimulationConfig) -> AgentSimulator {
        AgentSimulator::with_rng(config, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_huge_jitter_is_capped() {
        let mut sim = seeded(SimulationConfig { jitter: 1.0e308, ..SimulationConfig::default() });
        let agents = sim.initialize(&AgentName::ALL);
        let agents = sim.tick(&agents, Duration::from_secs(5));
        assert!(agents.iter().all(|a| a.progress <= 100));
    }

    #[test]
    fn test_initialize_staggers_delays() {
        let mut sim = seeded(SimulationConfig::default());
        let agents = sim.initialize(&AgentName::ALL);
        assert_eq!(agents.len(), 6);
        for (i, agent) in agents.iter().enumerate() {
            assert_eq!(agent.start_delay_ms, i as u64 * 500);
            assert_eq!(agent.status, AgentStatus::Idle);
            assert_eq!(agent.progress, 0);
            assert_eq!(agent.task, INITIAL_TASK);
            assert!((15_000..=25_000).contains(&agent.target_duration_ms));
        }
    }

    #[test]
    fn test_task_index_reserves_last_phase() {
        assert_eq!(task_index(0.0, 6, false), 0);
        assert_eq!(task_index(50.0, 6, false), 3);
        assert_eq!(task_index(99.0, 6, false), 4);
        assert_eq!(task_index(100.0, 6, true), 5);
        assert_eq!(task_index(100.0, 6, false), 4);
    }

    #[test]
    fn test_task_index_degenerate_lists() {
        assert_eq!(task_index(80.0, 0, false), 0);
        assert_eq!(task_index(80.0, 1, false), 0);
    }

    #[test]
    fn test_pending_before_start_delay() {
        let mut sim = seeded(SimulationConfig::default());
        let agents = sim.initialize(&AgentName::ALL);
        let after = sim.tick(&agents, Duration::from_millis(1700));

        assert_ne!(after[0].status, AgentStatus::Pending);
        assert_eq!(after[5].status, AgentStatus::Pending);
        assert_eq!(after[5].progress, 0);
        assert_eq!(after[5].task, QUEUED_TASK);
    }

    #[test]
    fn test_tick_never_decreases_progress() {
        let mut sim = seeded(SimulationConfig { jitter: 5.0, ..SimulationConfig::default() });
        let mut agents = sim.initialize(&AgentName::ALL);
        let mut elapsed = 0;
        while elapsed < 30_000 {
            elapsed += 300;
            let next = sim.tick(&agents, Duration::from_millis(elapsed));
            for (before, after) in agents.iter().zip(next.iter()) {
                assert!(after.progress >= before.progress, "{} regressed", after.name);
                if after.status == AgentStatus::Completed {
                    assert_eq!(after.progress, 100);
                }
            }
            agents = next;
        }
        assert!(agents.iter().all(Agent::is_completed));
    }

    #[test]
    fn test_target_duration_is_fixed_per_agent() {
        let mut sim = seeded(SimulationConfig::default());
        let agents = sim.initialize(&AgentName::ALL);
        let next = sim.tick(&agents, Duration::from_millis(4_000));
        let later = sim.tick(&next, Duration::from_millis(8_000));
        for ((a, b), c) in agents.iter().zip(next.iter()).zip(later.iter()) {
            assert_eq!(a.target_duration_ms, b.target_duration_ms);
            assert_eq!(b.target_duration_ms, c.target_duration_ms);
        }
    }

    #[test]
    fn test_completion_message_and_final_state() {
        let config = SimulationConfig {
            min_target_duration: Duration::from_millis(1_000),
            max_target_duration: Duration::from_millis(1_000),
            ..SimulationConfig::default()
        };
        let mut sim = seeded(config);
        let agents = sim.initialize(&[AgentName::Patent]);
        let done = sim.tick(&agents, Duration::from_millis(1_000));
        assert_eq!(done[0].status, AgentStatus::Completed);
        assert_eq!(done[0].progress, 100);
        assert!(done[0].task.starts_with("✓ Analysis complete - "));
        assert!(done[0].task.ends_with(" results"));

        // Completed agents are frozen
        let again = sim.tick(&done, Duration::from_millis(5_000));
        assert_eq!(again[0], done[0]);
    }

    #[test]
    fn test_running_task_follows_progress_bucket() {
        let config = SimulationConfig {
            min_target_duration: Duration::from_millis(10_000),
            max_target_duration: Duration::from_millis(10_000),
            jitter: 0.0,
            ..SimulationConfig::default()
        };
        let mut sim = seeded(config);
        let agents = sim.initialize(&[AgentName::Clinical]);
        let half = sim.tick(&agents, Duration::from_millis(5_000));
        assert_eq!(half[0].progress, 50);
        assert_eq!(half[0].status, AgentStatus::Running);
        assert_eq!(half[0].task, AgentName::Clinical.definition().phases[3]);

        let nearly = sim.tick(&half, Duration::from_millis(9_990));
        assert_eq!(nearly[0].status, AgentStatus::Running);
        assert!(nearly[0].progress <= 99);
        assert_eq!(nearly[0].task, AgentName::Clinical.definition().phases[4]);
    }

    #[test]
    fn test_error_agents_untouched() {
        let mut sim = seeded(SimulationConfig::default());
        let mut agents = sim.initialize(&[AgentName::Market]);
        agents[0].status = AgentStatus::Error;
        agents[0].progress = 30;
        let next = sim.tick(&agents, Duration::from_millis(20_000));
        assert_eq!(next[0], agents[0]);
    }

    #[test]
    fn test_demo_job_id_shape() {
        let mut sim = seeded(SimulationConfig::default());
        let id = sim.demo_job_id();
        assert_eq!(id.len(), 9);
        assert!(id.starts_with('#'));
        assert!(id[1..].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = seeded(SimulationConfig::default());
        let mut b = seeded(SimulationConfig::default());
        let agents_a = a.initialize(&AgentName::ALL);
        let agents_b = b.initialize(&AgentName::ALL);
        assert_eq!(agents_a, agents_b);
        assert_eq!(
            a.tick(&agents_a, Duration::from_millis(6_000)),
            b.tick(&agents_b, Duration::from_millis(6_000)),
        );
    }
}
