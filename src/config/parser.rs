use std::path::Path;
use crate::errors::RepurposeError;
use super::types::{RepurposeConfig, Settings};
use super::schema::CONFIG_SCHEMA;
use crate::simulator::MAX_JITTER;
use tracing::{debug, warn};

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<RepurposeConfig, RepurposeError> {
    if !path.exists() {
        return Err(RepurposeError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(RepurposeError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<RepurposeConfig, RepurposeError> {
    // An empty file is a valid, all-defaults config
    if content.trim().is_empty() {
        return Ok(RepurposeConfig::default());
    }

    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    validate_schema(&yaml)?;

    let config: RepurposeConfig = serde_yaml::from_value(yaml)?;

    validate_conflicts(&config)?;

    Ok(config)
}

/// Resolve settings from an optional config file plus the environment.
pub async fn load_settings(path: Option<&Path>) -> Result<Settings, RepurposeError> {
    let config = match path {
        Some(p) => parse_config(p).await?,
        None => RepurposeConfig::default(),
    };
    let mut settings = Settings::from_config(&config);
    settings.apply_env(|key| std::env::var(key).ok());
    debug!(api_url = %settings.api_url, database = %settings.database_path, "Settings resolved");
    Ok(settings)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), RepurposeError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| RepurposeError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| RepurposeError::Config(format!("Schema compilation error: {}", e)))?;

    if let Err(errors) = compiled.validate(&json_value) {
        // Advisory only; typed parsing and the conflict checks are authoritative
        for e in errors {
            warn!(validation_error = %e, path = %e.instance_path, "Config schema warning");
        }
    }

    Ok(())
}

/// Detect values that parse but cannot drive a session.
fn validate_conflicts(config: &RepurposeConfig) -> Result<(), RepurposeError> {
    if let Some(sim) = &config.simulation {
        if let (Some(min), Some(max)) = (sim.min_duration_ms, sim.max_duration_ms) {
            if min > max {
                return Err(RepurposeError::Config(format!(
                    "simulation.min_duration_ms ({}) is greater than max_duration_ms ({})",
                    min, max
                )));
            }
        }
        if sim.tick_ms == Some(0) {
            return Err(RepurposeError::Config("simulation.tick_ms must be greater than zero".into()));
        }
        if sim.min_duration_ms == Some(0) || sim.max_duration_ms == Some(0) {
            return Err(RepurposeError::Config("simulation durations must be greater than zero".into()));
        }
        if let Some(jitter) = sim.jitter {
            if !jitter.is_finite() || !(0.0..=MAX_JITTER).contains(&jitter) {
                return Err(RepurposeError::Config(format!(
                    "simulation.jitter must be between 0 and {}, got {}",
                    MAX_JITTER, jitter
                )));
            }
        }
    }

    if let Some(polling) = &config.polling {
        if polling.interval_ms == Some(0) || polling.activity_interval_ms == Some(0) {
            return Err(RepurposeError::Config("polling intervals must be greater than zero".into()));
        }
    }

    if let Some(history) = &config.history {
        if history.max_jobs == Some(0) || history.max_exports == Some(0) {
            return Err(RepurposeError::Config("history caps must be greater than zero".into()));
        }
    }

    if let Some(backend) = &config.backend {
        if backend.retry_attempts == Some(0) {
            return Err(RepurposeError::Config("backend.retry_attempts must be at least 1".into()));
        }
        if backend.auth_token.as_deref().is_some_and(|t| !t.is_empty()) {
            warn!("Auth token stored in config file; prefer REPURPOSE_AUTH_TOKEN");
        }
    }

    Ok(())
}
