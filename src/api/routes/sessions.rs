use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use crate::api::models::{CreateSessionRequest, SessionSummary};
use crate::api::AppState;
use crate::errors::RepurposeError;
use crate::session::{DashboardSession, SessionHandle};
use crate::simulator::AgentStats;
use crate::utils::validation::validate_query;

pub(crate) fn find_session(state: &AppState, id: &str) -> Result<Arc<SessionHandle>, RepurposeError> {
    state
        .sessions
        .get(id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| RepurposeError::NotFound(format!("session {}", id)))
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<Value>), RepurposeError> {
    let query = validate_query(&req.query)?;
    state.prune_finished_sessions().await;

    let mut session = DashboardSession::new(&query, state.session_config.clone());
    if let (Some(client), false) = (&state.client, req.demo) {
        session = session.with_client(client.clone());
    }
    if let Some(seed) = req.seed {
        session = session.with_seed(seed);
    }

    let handle = session.start();
    let snapshot = handle.snapshot().await;
    let summary = SessionSummary::new(&handle.id, &snapshot, &AgentStats::compute(&snapshot.agents), true);
    state.sessions.insert(handle.id.clone(), Arc::new(handle));

    Ok((StatusCode::CREATED, Json(json!(summary))))
}

pub async fn list_sessions(State(state): State<AppState>) -> Json<Value> {
    let handles: Vec<Arc<SessionHandle>> = state.sessions.iter().map(|e| e.value().clone()).collect();

    let mut sessions = Vec::with_capacity(handles.len());
    for handle in handles {
        let snapshot = handle.snapshot().await;
        let stats = AgentStats::compute(&snapshot.agents);
        sessions.push(SessionSummary::new(&handle.id, &snapshot, &stats, handle.is_live()));
    }
    sessions.sort_by(|a, b| a.id.cmp(&b.id));

    Json(json!({ "total": sessions.len(), "sessions": sessions }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RepurposeError> {
    let handle = find_session(&state, &id)?;
    let snapshot = handle.snapshot().await;
    let stats = AgentStats::compute(&snapshot.agents);

    Ok(Json(json!({
        "id": handle.id,
        "live": handle.is_live(),
        "snapshot": snapshot,
        "stats": stats,
        "activity": handle.activity().await,
    })))
}

/// Stops the session and forgets it. The last snapshot is returned.
pub async fn stop_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RepurposeError> {
    let (_, handle) = state
        .sessions
        .remove(&id)
        .ok_or_else(|| RepurposeError::NotFound(format!("session {}", id)))?;
    handle.stop();

    Ok(Json(json!({"stopped": true, "snapshot": handle.snapshot().await})))
}
