use axum::{extract::State, Json};
use serde_json::{json, Value};
use crate::api::models::ContextUpdate;
use crate::api::AppState;
use crate::errors::RepurposeError;

pub async fn get_context(State(state): State<AppState>) -> Json<Value> {
    Json(json!(*state.context.read().await))
}

pub async fn update_context(
    State(state): State<AppState>,
    Json(update): Json<ContextUpdate>,
) -> Result<Json<Value>, RepurposeError> {
    let mut ctx = state.context.write().await;

    if let Some(name) = update.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepurposeError::Validation("name must not be empty".to_string()));
        }
        ctx.name = name.to_string();
    }
    if let Some(role) = update.role {
        let role = role.trim();
        if role != ctx.role {
            ctx.switch_role(role);
        }
    }

    Ok(Json(json!(*ctx)))
}

pub async fn complete_onboarding(State(state): State<AppState>) -> Json<Value> {
    let mut ctx = state.context.write().await;
    ctx.complete_onboarding();
    Json(json!(*ctx))
}
