use axum::{extract::State, Json};
use serde_json::{json, Value};
use crate::api::models::PreferencesUpdate;
use crate::api::AppState;
use crate::errors::RepurposeError;

pub async fn get_preferences(State(state): State<AppState>) -> Result<Json<Value>, RepurposeError> {
    Ok(Json(json!(state.db.preferences()?)))
}

pub async fn update_preferences(
    State(state): State<AppState>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<Value>, RepurposeError> {
    let mut prefs = state.db.preferences()?;

    if let Some(theme) = update.theme {
        if !matches!(theme.as_str(), "dark" | "light") {
            return Err(RepurposeError::Validation(format!("unknown theme '{}'", theme)));
        }
        prefs.theme = theme;
    }
    if let Some(notifications) = update.notifications {
        prefs.notifications = notifications;
    }
    if let Some(auto_refresh) = update.auto_refresh {
        prefs.auto_refresh = auto_refresh;
    }

    state.db.save_preferences(&prefs)?;
    Ok(Json(json!(prefs)))
}
