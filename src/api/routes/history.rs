use axum::{extract::State, Json};
use serde_json::{json, Value};
use crate::api::AppState;
use crate::errors::RepurposeError;

pub async fn list_jobs(State(state): State<AppState>) -> Result<Json<Value>, RepurposeError> {
    let jobs = state.db.list_jobs()?;
    Ok(Json(json!({ "jobs": jobs, "total": jobs.len() })))
}

pub async fn list_exports(State(state): State<AppState>) -> Result<Json<Value>, RepurposeError> {
    let exports = state.db.list_exports()?;
    Ok(Json(json!({ "exports": exports, "total": exports.len() })))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Value>, RepurposeError> {
    Ok(Json(json!(state.db.history_stats()?)))
}

/// Clears job and export history. Cached results are dropped with it.
pub async fn clear_history(State(state): State<AppState>) -> Result<Json<Value>, RepurposeError> {
    state.db.clear_history()?;
    state.clear_results_cache();
    Ok(Json(json!({"cleared": true})))
}
