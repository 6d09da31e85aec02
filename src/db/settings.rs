use crate::errors::RepurposeError;
use crate::models::UserPreferences;
use super::Database;

const PREFERENCES_KEY: &str = "user_preferences";

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, RepurposeError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")
            .map_err(|e| RepurposeError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![key], |row: &rusqlite::Row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(RepurposeError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), RepurposeError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            rusqlite::params![key, value],
        ).map_err(|e| RepurposeError::Database(format!("Insert failed: {}", e)))?;
        Ok(())
    }

    /// Stored preferences, or the defaults when none were saved or the stored
    /// value no longer parses.
    pub fn preferences(&self) -> Result<UserPreferences, RepurposeError> {
        let Some(raw) = self.get_setting(PREFERENCES_KEY)? else {
            return Ok(UserPreferences::default());
        };
        match serde_json::from_str(&raw) {
            Ok(prefs) => Ok(prefs),
            Err(e) => {
                tracing::warn!(error = %e, "Stored preferences unreadable, using defaults");
                Ok(UserPreferences::default())
            }
        }
    }

    pub fn save_preferences(&self, prefs: &UserPreferences) -> Result<(), RepurposeError> {
        let raw = serde_json::to_string(prefs)?;
        self.set_setting(PREFERENCES_KEY, &raw)
    }
}
