use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::db::HistoryLimits;
use crate::errors::RetryConfig;
use crate::simulator::SimulationConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_DATABASE_PATH: &str = "./data/repurpose.db";
pub const API_URL_ENV: &str = "REPURPOSE_API_URL";
pub const AUTH_TOKEN_ENV: &str = "REPURPOSE_AUTH_TOKEN";

/// On-disk configuration. Every field is optional; see [`Settings`] for the
/// resolved values.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RepurposeConfig {
    pub backend: Option<BackendConfig>,
    pub simulation: Option<SimulationSection>,
    pub polling: Option<PollingConfig>,
    pub history: Option<HistoryConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub auth_token: Option<String>,
    pub retry_attempts: Option<u32>,
    pub retry_base_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SimulationSection {
    pub tick_ms: Option<u64>,
    pub stagger_ms: Option<u64>,
    pub startup_delay_ms: Option<u64>,
    pub min_duration_ms: Option<u64>,
    pub max_duration_ms: Option<u64>,
    pub jitter: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PollingConfig {
    pub interval_ms: Option<u64>,
    pub activity_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HistoryConfig {
    pub database: Option<String>,
    pub max_jobs: Option<usize>,
    pub max_exports: Option<usize>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Duration,
    pub auth_token: Option<String>,
    pub retry: RetryConfig,
    pub simulation: SimulationConfig,
    pub poll_interval: Duration,
    pub activity_interval: Duration,
    pub database_path: String,
    pub history: HistoryLimits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            auth_token: None,
            retry: RetryConfig::default(),
            simulation: SimulationConfig::default(),
            poll_interval: Duration::from_millis(1000),
            activity_interval: Duration::from_millis(1200),
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            history: HistoryLimits::default(),
        }
    }
}

impl Settings {
    /// Layer file values over the defaults.
    pub fn from_config(config: &RepurposeConfig) -> Self {
        let mut s = Settings::default();
        let ms = Duration::from_millis;

        if let Some(b) = &config.backend {
            if let Some(url) = &b.url { s.api_url = url.clone(); }
            if let Some(t) = b.timeout_secs { s.timeout = Duration::from_secs(t); }
            if let Some(token) = &b.auth_token { s.auth_token = Some(token.clone()); }
            if let Some(n) = b.retry_attempts { s.retry.max_attempts = n; }
            if let Some(d) = b.retry_base_delay_ms { s.retry.base_delay = ms(d); }
        }
        if let Some(sim) = &config.simulation {
            if let Some(v) = sim.tick_ms { s.simulation.tick_interval = ms(v); }
            if let Some(v) = sim.stagger_ms { s.simulation.stagger = ms(v); }
            if let Some(v) = sim.startup_delay_ms { s.simulation.startup_delay = ms(v); }
            if let Some(v) = sim.min_duration_ms { s.simulation.min_target_duration = ms(v); }
            if let Some(v) = sim.max_duration_ms { s.simulation.max_target_duration = ms(v); }
            if let Some(v) = sim.jitter { s.simulation.jitter = v; }
        }
        if let Some(p) = &config.polling {
            if let Some(v) = p.interval_ms { s.poll_interval = ms(v); }
            if let Some(v) = p.activity_interval_ms { s.activity_interval = ms(v); }
        }
        if let Some(h) = &config.history {
            if let Some(db) = &h.database { s.database_path = db.clone(); }
            if let Some(v) = h.max_jobs { s.history.max_jobs = v; }
            if let Some(v) = h.max_exports { s.history.max_exports = v; }
        }
        s
    }

    /// Apply `REPURPOSE_API_URL` and `REPURPOSE_AUTH_TOKEN`, read through
    /// `lookup` so tests need not touch the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(token) = lookup(AUTH_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            self.auth_token = Some(token);
        }
    }
}
