pub mod errors;
pub mod models;
pub mod routes;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use axum::routing::{get, post};
use axum::Router;
use dashmap::DashMap;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;
use crate::client::{HttpJobClient, JobClient};
use crate::config::Settings;
use crate::context::AppContext;
use crate::db::Database;
use crate::errors::{RepurposeError, RetryConfig};
use crate::models::JobResultsResponse;
use crate::session::{SessionConfig, SessionHandle};

/// Finished sessions kept for inspection before the oldest are forgotten.
pub const DEFAULT_MAX_FINISHED_SESSIONS: usize = 50;
/// Jobs whose candidates are kept in memory.
pub const DEFAULT_MAX_CACHED_RESULTS: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// `None` runs every session as a local simulation.
    pub client: Option<Arc<dyn JobClient>>,
    pub sessions: Arc<DashMap<String, Arc<SessionHandle>>>,
    /// Candidates of completed jobs, keyed by backend job id.
    pub results_cache: Arc<DashMap<String, Arc<JobResultsResponse>>>,
    /// Insertion order of `results_cache`, oldest first.
    results_order: Arc<Mutex<VecDeque<String>>>,
    pub max_finished_sessions: usize,
    pub max_cached_results: usize,
    pub context: Arc<RwLock<AppContext>>,
    pub session_config: SessionConfig,
    pub retry: RetryConfig,
}

impl AppState {
    pub fn new(db: Database, client: Option<Arc<dyn JobClient>>, session_config: SessionConfig) -> Self {
        let retry = session_config.retry.clone();
        Self {
            db,
            client,
            sessions: Arc::new(DashMap::new()),
            results_cache: Arc::new(DashMap::new()),
            results_order: Arc::new(Mutex::new(VecDeque::new())),
            max_finished_sessions: DEFAULT_MAX_FINISHED_SESSIONS,
            max_cached_results: DEFAULT_MAX_CACHED_RESULTS,
            context: Arc::new(RwLock::new(AppContext::default())),
            session_config,
            retry,
        }
    }

    pub fn with_retention(mut self, finished_sessions: usize, cached_results: usize) -> Self {
        self.max_finished_sessions = finished_sessions;
        self.max_cached_results = cached_results.max(1);
        self
    }

    /// Forget the oldest finished sessions beyond `max_finished_sessions`.
    /// Live sessions are never removed.
    pub async fn prune_finished_sessions(&self) {
        let handles: Vec<Arc<SessionHandle>> = self
            .sessions
            .iter()
            .filter(|e| !e.value().is_live())
            .map(|e| e.value().clone())
            .collect();
        if handles.len() <= self.max_finished_sessions {
            return;
        }

        let mut finished = Vec::with_capacity(handles.len());
        for handle in handles {
            let started_at = handle.snapshot().await.started_at;
            finished.push((started_at, handle.id.clone()));
        }
        finished.sort();

        let excess = finished.len() - self.max_finished_sessions;
        for (_, id) in finished.into_iter().take(excess) {
            self.sessions.remove(&id);
        }
        debug!(removed = excess, "Pruned finished sessions");
    }

    pub fn cached_results(&self, job_id: &str) -> Option<Arc<JobResultsResponse>> {
        self.results_cache.get(job_id).map(|e| e.value().clone())
    }

    /// Cache a job's candidates, evicting the oldest entries once the cache
    /// holds `max_cached_results` jobs.
    pub fn cache_results(&self, job_id: &str, results: Arc<JobResultsResponse>) {
        let mut order = self.results_order.lock().unwrap_or_else(|e| e.into_inner());
        if self.results_cache.insert(job_id.to_string(), results).is_none() {
            order.push_back(job_id.to_string());
        }
        while order.len() > self.max_cached_results {
            if let Some(oldest) = order.pop_front() {
                self.results_cache.remove(&oldest);
            }
        }
    }

    pub fn clear_results_cache(&self) {
        let mut order = self.results_order.lock().unwrap_or_else(|e| e.into_inner());
        order.clear();
        self.results_cache.clear();
    }
}

pub async fn create_app_state(settings: &Settings, offline: bool) -> Result<AppState, RepurposeError> {
    let db = Database::new(&settings.database_path)?.with_limits(settings.history);
    let client: Option<Arc<dyn JobClient>> = if offline {
        None
    } else {
        Some(Arc::new(HttpJobClient::new(
            &settings.api_url,
            settings.timeout,
            settings.auth_token.clone(),
        )?))
    };
    Ok(AppState::new(db, client, SessionConfig::from(settings)))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/sessions", post(routes::sessions::create_session).get(routes::sessions::list_sessions))
        .route("/api/sessions/:id", get(routes::sessions::get_session).delete(routes::sessions::stop_session))
        .route("/api/sessions/:id/results", get(routes::results::get_results))
        .route("/api/sessions/:id/export", post(routes::results::export_report))
        .route("/api/history", axum::routing::delete(routes::history::clear_history))
        .route("/api/history/jobs", get(routes::history::list_jobs))
        .route("/api/history/exports", get(routes::history::list_exports))
        .route("/api/history/stats", get(routes::history::get_stats))
        .route("/api/preferences", get(routes::preferences::get_preferences).put(routes::preferences::update_preferences))
        .route("/api/context", get(routes::context::get_context).put(routes::context::update_context))
        .route("/api/context/onboarding", post(routes::context::complete_onboarding))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
