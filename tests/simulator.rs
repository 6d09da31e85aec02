use std::time::Duration;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use repurpose::agents::AgentName;
use repurpose::models::{AgentStatusRecord, JobStatusResponse};
use repurpose::session::{DashboardSession, SessionConfig, SessionEvent};
use repurpose::simulator::{
    apply_status_response, AgentSimulator, AgentStats, AgentStatus, DataSource, JobSnapshot,
    JobStatus, SimulationConfig,
};

#[test]
fn test_simulation_finishes_all_agents_within_window() {
    let config = SimulationConfig::default();
    let mut sim = AgentSimulator::with_rng(config.clone(), StdRng::seed_from_u64(42));
    let mut agents = sim.initialize(&AgentName::ALL);

    let mut previous: Vec<u8> = agents.iter().map(|a| a.progress).collect();
    let mut finished_at = None;
    let mut elapsed = Duration::ZERO;

    while elapsed <= Duration::from_secs(30) {
        agents = sim.tick(&agents, elapsed);

        for (agent, before) in agents.iter().zip(&previous) {
            assert!(agent.progress >= *before, "{} went backwards", agent.name);
            match agent.status {
                AgentStatus::Running => assert!(agent.progress <= 99),
                AgentStatus::Completed => assert_eq!(agent.progress, 100),
                AgentStatus::Idle | AgentStatus::Pending => assert_eq!(agent.progress, 0),
                AgentStatus::Error => panic!("simulation never reports errors"),
            }
        }
        previous = agents.iter().map(|a| a.progress).collect();

        if finished_at.is_none() && AgentStats::compute(&agents).all_completed {
            finished_at = Some(elapsed);
        }
        elapsed += config.tick_interval;
    }

    let finished_at = finished_at.expect("agents never finished");
    // Last agent starts 2.5s in and runs for at most 25s
    assert!(finished_at <= Duration::from_millis(27_800), "finished at {:?}", finished_at);

    let stats = AgentStats::compute(&agents);
    assert_eq!(stats.completed, 6);
    assert_eq!(stats.overall_progress, 100);
}

#[test]
fn test_agents_wait_for_their_start_delay() {
    let mut sim = AgentSimulator::with_rng(SimulationConfig::default(), StdRng::seed_from_u64(1));
    let agents = sim.initialize(&AgentName::ALL);
    let agents = sim.tick(&agents, Duration::from_millis(600));

    // Stagger of 500ms: only the first two agents have started
    let started = agents
        .iter()
        .filter(|a| !matches!(a.status, AgentStatus::Idle | AgentStatus::Pending))
        .count();
    assert_eq!(started, 2);
}

#[test]
fn test_backend_reconciliation_never_regresses() {
    let mut sim = AgentSimulator::with_rng(SimulationConfig::default(), StdRng::seed_from_u64(9));
    let agents = sim.initialize(&AgentName::ALL);
    let mut snapshot = JobSnapshot::new("JOB777", "q", DataSource::Backend, agents);
    snapshot.status = JobStatus::Running;

    let report = |state: &str, progress: f64| JobStatusResponse {
        status: Some("running".into()),
        per_agent_status: vec![AgentStatusRecord {
            agent: "CLINICAL".into(),
            state: Some(state.into()),
            progress: Some(progress),
            task: Some("Reviewing trials".into()),
        }],
    };

    apply_status_response(&mut snapshot, &report("running", 60.0));
    apply_status_response(&mut snapshot, &report("running", 40.0));
    assert_eq!(snapshot.agents[0].progress, 60);
    assert_eq!(snapshot.agents[0].task, "Reviewing trials");

    apply_status_response(&mut snapshot, &report("completed", 10.0));
    assert_eq!(snapshot.agents[0].progress, 100);
    // One agent done is not the job done
    assert_eq!(snapshot.status, JobStatus::Running);
}

#[tokio::test(start_paused = true)]
async fn test_demo_session_event_stream() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut handle = DashboardSession::new("Find kinase inhibitors for Alzheimer's", SessionConfig::default())
        .with_seed(21)
        .with_event_channel(tx)
        .start();

    let snapshot = tokio::time::timeout(Duration::from_secs(40), handle.wait())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.status, JobStatus::Completed);

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    assert!(matches!(events.first(), Some(SessionEvent::JobStarted { source: DataSource::Demo, .. })));
    assert!(matches!(events.last(), Some(SessionEvent::JobFinished { status: JobStatus::Completed, .. })));
    assert!(events.iter().any(|e| matches!(e, SessionEvent::StatusChanged { status: JobStatus::Running })));
    assert!(events.iter().any(|e| matches!(e, SessionEvent::Activity(_))));
    assert!(!events.iter().any(|e| matches!(e, SessionEvent::ConnectionError { .. })));

    let activity = handle.activity().await;
    assert!(!activity.is_empty());
    assert!(activity.len() <= 30);
}
