use axum::{extract::State, Json};
use serde_json::{json, Value};
use crate::api::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let backend = match &state.client {
        None => json!({"configured": false}),
        Some(client) => match client.health().await {
            Ok(body) => json!({"configured": true, "reachable": true, "name": client.backend_name(), "health": body}),
            Err(e) => {
                tracing::debug!(error = %e, "Backend health check failed");
                json!({"configured": true, "reachable": false, "name": client.backend_name(), "error": e.user_message()})
            }
        },
    };

    Json(json!({
        "status": "healthy",
        "service": "repurpose",
        "version": env!("CARGO_PKG_VERSION"),
        "gitHash": option_env!("GIT_HASH").unwrap_or("unknown"),
        "buildTimestamp": option_env!("BUILD_TIMESTAMP"),
        "activeSessions": state.sessions.len(),
        "backend": backend,
    }))
}
