use std::sync::Arc;
use std::time::Duration;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::agents::AgentName;
use crate::client::JobClient;
use crate::config::Settings;
use crate::errors::{with_retry, RepurposeError, RetryConfig};
use crate::models::{CreateJobRequest, JobOptions, JobStatusResponse};
use crate::simulator::{
    apply_status_response, ActivityFeed, ActivityLine, AgentSimulator, AgentStats, DataSource,
    JobSnapshot, JobStatus, SimulationConfig,
};
use super::events::SessionEvent;

type PollResult = (String, Result<JobStatusResponse, RepurposeError>);

/// Timers and agents for one dashboard session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub simulation: SimulationConfig,
    pub poll_interval: Duration,
    pub activity_interval: Duration,
    pub retry: RetryConfig,
    pub agents: Vec<AgentName>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for SessionConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            simulation: settings.simulation.clone(),
            poll_interval: settings.poll_interval,
            activity_interval: settings.activity_interval,
            retry: settings.retry.clone(),
            agents: AgentName::ALL.to_vec(),
        }
    }
}

/// Builder for a live session. Call [`DashboardSession::start`] from inside a
/// tokio runtime.
pub struct DashboardSession {
    query: String,
    config: SessionConfig,
    client: Option<Arc<dyn JobClient>>,
    seed: Option<u64>,
    event_tx: Option<mpsc::UnboundedSender<SessionEvent>>,
    existing_job: Option<String>,
}

impl DashboardSession {
    pub fn new(query: &str, config: SessionConfig) -> Self {
        Self {
            query: query.to_string(),
            config,
            client: None,
            seed: None,
            event_tx: None,
            existing_job: None,
        }
    }

    /// Submit the query to a backend. Without a client the session runs the
    /// local simulation only.
    pub fn with_client(mut self, client: Arc<dyn JobClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Pin the random source of the simulator and the activity feed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Follow a job that already exists on the backend instead of creating
    /// one. Needs a client.
    pub fn with_existing_job(mut self, job_id: &str) -> Self {
        self.existing_job = Some(job_id.to_string());
        self
    }

    /// Attach an event channel for streaming session events to a renderer.
    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn start(self) -> SessionHandle {
        let (mut simulator, feed) = match self.seed {
            Some(seed) => (
                AgentSimulator::with_rng(self.config.simulation.clone(), StdRng::seed_from_u64(seed)),
                ActivityFeed::with_rng(StdRng::seed_from_u64(seed.wrapping_add(1))),
            ),
            None => (AgentSimulator::new(self.config.simulation.clone()), ActivityFeed::new()),
        };

        let agents = simulator.initialize(&self.config.agents);
        let provisional_id = simulator.demo_job_id();
        let snapshot = Arc::new(RwLock::new(JobSnapshot::new(
            &provisional_id,
            &self.query,
            DataSource::Demo,
            agents,
        )));
        let activity = Arc::new(RwLock::new(feed.lines()));
        let cancel = CancellationToken::new();
        let (bind_tx, bind_rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4().to_string();

        info!(session_id = %id, job_id = %provisional_id, backend = self.client.is_some(), "Session started");

        let task = SessionTask {
            session_id: id.clone(),
            query: self.query,
            config: self.config,
            client: self.client,
            simulator,
            feed,
            snapshot: snapshot.clone(),
            activity: activity.clone(),
            cancel: cancel.clone(),
            event_tx: self.event_tx,
            bound: None,
            started: false,
        };
        let join = tokio::spawn(task.run(bind_rx, self.existing_job));

        SessionHandle {
            id,
            snapshot,
            activity,
            cancel,
            bind_tx,
            task: Some(join),
        }
    }
}

/// Owner-side view of a running session. Dropping the handle tears the
/// session down.
pub struct SessionHandle {
    pub id: String,
    snapshot: Arc<RwLock<JobSnapshot>>,
    activity: Arc<RwLock<Vec<ActivityLine>>>,
    cancel: CancellationToken,
    bind_tx: mpsc::UnboundedSender<String>,
    task: Option<JoinHandle<()>>,
}

impl SessionHandle {
    pub async fn snapshot(&self) -> JobSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn stats(&self) -> AgentStats {
        AgentStats::compute(&self.snapshot.read().await.agents)
    }

    pub async fn activity(&self) -> Vec<ActivityLine> {
        self.activity.read().await.clone()
    }

    /// Hand the session a backend job id. Local ticks stop and any poll
    /// still in flight for a previous id is discarded.
    pub fn bind(&self, job_id: &str) {
        let _ = self.bind_tx.send(job_id.to_string());
    }

    /// Stop all timers. No further changes reach the snapshot afterwards.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_live(&self) -> bool {
        !self.cancel.is_cancelled() && self.task.as_ref().map_or(false, |t| !t.is_finished())
    }

    /// Wait for the session to finish and return its final snapshot.
    pub async fn wait(&mut self) -> Result<JobSnapshot, RepurposeError> {
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| RepurposeError::Internal(format!("Session task failed: {}", e)))?;
        }
        Ok(self.snapshot().await)
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct SessionTask {
    session_id: String,
    query: String,
    config: SessionConfig,
    client: Option<Arc<dyn JobClient>>,
    simulator: AgentSimulator,
    feed: ActivityFeed,
    snapshot: Arc<RwLock<JobSnapshot>>,
    activity: Arc<RwLock<Vec<ActivityLine>>>,
    cancel: CancellationToken,
    event_tx: Option<mpsc::UnboundedSender<SessionEvent>>,
    /// Backend job id driving the session, if any.
    bound: Option<String>,
    started: bool,
}

fn timer(period: Duration) -> Interval {
    let mut t = interval(period);
    t.set_missed_tick_behavior(MissedTickBehavior::Delay);
    t
}

impl SessionTask {
    async fn run(mut self, mut bind_rx: mpsc::UnboundedReceiver<String>, existing_job: Option<String>) {
        let started_at = Instant::now();
        let cancel = self.cancel.clone();
        {
            let snapshot = self.snapshot.read().await;
            self.emit(SessionEvent::JobStarted {
                job_id: snapshot.job_id.clone(),
                source: snapshot.source,
            });
        }

        let (mut create_rx, mut creating) = match existing_job {
            Some(job_id) => {
                self.bind(job_id).await;
                (oneshot::channel().1, false)
            }
            None => self.spawn_create(),
        };

        let startup = sleep(self.config.simulation.startup_delay);
        tokio::pin!(startup);
        let mut tick = timer(self.config.simulation.tick_interval);
        let mut poll = timer(self.config.poll_interval);
        let mut activity = timer(self.config.activity_interval);
        let (poll_tx, mut poll_rx) = mpsc::unbounded_channel::<PollResult>();
        let mut poll_in_flight = false;

        loop {
            let ticking = self.started && self.bound.is_none();
            let polling = self.bound.is_some() && self.client.is_some() && !poll_in_flight;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(session_id = %self.session_id, "Session cancelled");
                    break;
                }
                _ = &mut startup, if !self.started => {
                    self.on_started().await;
                }
                created = &mut create_rx, if creating => {
                    creating = false;
                    match created {
                        Ok(Ok(job_id)) => self.bind(job_id).await,
                        Ok(Err(e)) => self.on_create_failed(e).await,
                        Err(_) => {}
                    }
                }
                Some(job_id) = bind_rx.recv() => {
                    // An explicit bind supersedes a creation still in flight
                    creating = false;
                    poll_in_flight = false;
                    self.bind(job_id).await;
                }
                _ = tick.tick(), if ticking => {
                    self.on_tick(started_at.elapsed()).await;
                }
                _ = poll.tick(), if polling => {
                    poll_in_flight = self.spawn_poll(poll_tx.clone());
                }
                Some((job_id, result)) = poll_rx.recv() => {
                    if self.bound.as_deref() == Some(job_id.as_str()) {
                        poll_in_flight = false;
                        self.on_poll(result).await;
                    } else {
                        debug!(session_id = %self.session_id, stale_job = %job_id, "Discarding poll for unbound job");
                    }
                }
                _ = activity.tick() => {
                    self.on_activity().await;
                }
            }

            if cancel.is_cancelled() {
                break;
            }
            if self.finish_if_terminal().await {
                break;
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }

    /// Start backend job creation in the background, retried with backoff.
    fn spawn_create(&self) -> (oneshot::Receiver<Result<String, RepurposeError>>, bool) {
        let (tx, rx) = oneshot::channel();
        let Some(client) = self.client.clone() else {
            return (rx, false);
        };

        let request = CreateJobRequest {
            options: Some(JobOptions {
                run_agents: self.config.agents.iter().map(|a| a.as_str().to_lowercase()).collect(),
                ..JobOptions::default()
            }),
            ..CreateJobRequest::new(&self.query)
        };
        let retry = self.config.retry.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                result = with_retry("create_job", &retry, || client.create_job(&request)) => {
                    let _ = tx.send(result);
                }
            }
        });
        (rx, true)
    }

    fn spawn_poll(&self, tx: mpsc::UnboundedSender<PollResult>) -> bool {
        let (Some(client), Some(job_id)) = (self.client.clone(), self.bound.clone()) else {
            return false;
        };
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                result = client.get_status(&job_id) => {
                    let _ = tx.send((job_id, result));
                }
            }
        });
        true
    }

    async fn on_started(&mut self) {
        self.started = true;
        let mut snapshot = self.snapshot.write().await;
        if snapshot.status == JobStatus::Initializing {
            snapshot.status = JobStatus::Running;
            self.emit(SessionEvent::StatusChanged { status: JobStatus::Running });
        }
    }

    async fn bind(&mut self, job_id: String) {
        if self.client.is_none() {
            warn!(session_id = %self.session_id, job_id = %job_id, "Cannot follow a backend job without a client");
            return;
        }
        info!(session_id = %self.session_id, job_id = %job_id, "Bound to backend job");
        {
            let mut snapshot = self.snapshot.write().await;
            snapshot.job_id = job_id.clone();
            snapshot.source = DataSource::Backend;
            snapshot.connection_error = None;
        }
        self.bound = Some(job_id.clone());
        self.emit(SessionEvent::JobBound { job_id });
    }

    async fn on_create_failed(&mut self, e: RepurposeError) {
        let classification = e.classify();
        warn!(
            session_id = %self.session_id,
            error = %e,
            error_kind = %classification.kind,
            "Job creation failed, continuing with local simulation"
        );
        let message = e.user_message();
        self.snapshot.write().await.connection_error = Some(message.clone());
        self.emit(SessionEvent::ConnectionError { message });
    }

    async fn on_tick(&mut self, elapsed: Duration) {
        let mut snapshot = self.snapshot.write().await;
        if snapshot.agents.iter().all(|a| a.is_completed()) {
            return;
        }
        let agents = self.simulator.tick(&snapshot.agents, elapsed);
        let before = snapshot.status;
        snapshot.replace_agents(agents);
        self.emit(SessionEvent::AgentsUpdated { agents: snapshot.agents.clone() });
        if snapshot.status != before {
            self.emit(SessionEvent::StatusChanged { status: snapshot.status });
        }
    }

    async fn on_poll(&mut self, result: Result<JobStatusResponse, RepurposeError>) {
        let mut snapshot = self.snapshot.write().await;
        match result {
            Ok(response) => {
                let was_disconnected = snapshot.connection_error.take().is_some();
                let before = snapshot.status;
                apply_status_response(&mut snapshot, &response);
                if was_disconnected {
                    self.emit(SessionEvent::ConnectionRestored);
                }
                self.emit(SessionEvent::AgentsUpdated { agents: snapshot.agents.clone() });
                if snapshot.status != before {
                    self.emit(SessionEvent::StatusChanged { status: snapshot.status });
                }
            }
            Err(e) => {
                // Agents are left alone; the next poll retries on its own
                warn!(session_id = %self.session_id, job_id = %snapshot.job_id, error = %e, "Status poll failed");
                let message = e.user_message();
                snapshot.connection_error = Some(message.clone());
                self.emit(SessionEvent::ConnectionError { message });
            }
        }
    }

    async fn on_activity(&mut self) {
        let agents = self.snapshot.read().await.agents.clone();
        if let Some(line) = self.feed.observe(&agents) {
            *self.activity.write().await = self.feed.lines();
            self.emit(SessionEvent::Activity(line));
        }
    }

    async fn finish_if_terminal(&mut self) -> bool {
        let snapshot = self.snapshot.read().await;
        if !snapshot.status.is_terminal() {
            return false;
        }
        info!(
            session_id = %self.session_id,
            job_id = %snapshot.job_id,
            status = %snapshot.status,
            query = %self.query,
            "Session finished"
        );
        self.emit(SessionEvent::JobFinished {
            job_id: snapshot.job_id.clone(),
            status: snapshot.status,
        });
        true
    }
}
