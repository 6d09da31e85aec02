use chrono::Utc;
use crate::errors::RepurposeError;
use crate::models::ExportHistoryEntry;
use super::Database;
use super::history::parse_timestamp;

impl Database {
    /// Append an export record (newest first) and cap the list.
    pub fn record_export(
        &self,
        job_id: &str,
        format: &str,
        size_bytes: u64,
    ) -> Result<ExportHistoryEntry, RepurposeError> {
        let now = Utc::now();
        let entry = ExportHistoryEntry {
            id: format!("EXP{}", now.timestamp_millis()),
            job_id: job_id.to_string(),
            format: format.to_string(),
            timestamp: now,
            size_bytes,
        };

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO export_history (id, job_id, format, timestamp, size_bytes) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![entry.id, entry.job_id, entry.format, entry.timestamp.to_rfc3339(), entry.size_bytes as i64],
        ).map_err(|e| RepurposeError::Database(format!("Insert failed: {}", e)))?;

        conn.execute(
            "DELETE FROM export_history WHERE seq NOT IN (SELECT seq FROM export_history ORDER BY seq DESC LIMIT ?1)",
            rusqlite::params![self.limits.max_exports as i64],
        ).map_err(|e| RepurposeError::Database(format!("Trim failed: {}", e)))?;

        Ok(entry)
    }

    pub fn list_exports(&self) -> Result<Vec<ExportHistoryEntry>, RepurposeError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, job_id, format, timestamp, size_bytes FROM export_history ORDER BY seq DESC"
        ).map_err(|e| RepurposeError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt.query_map([], |row: &rusqlite::Row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        }).map_err(|e| RepurposeError::Database(format!("Query error: {}", e)))?;

        let mut exports = Vec::new();
        for row in rows {
            let (id, job_id, format, timestamp, size) =
                row.map_err(|e| RepurposeError::Database(format!("Row error: {}", e)))?;
            exports.push(ExportHistoryEntry {
                id,
                job_id,
                format,
                timestamp: parse_timestamp(&timestamp)?,
                size_bytes: size.max(0) as u64,
            });
        }
        Ok(exports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_ids_use_millis_prefix() {
        let db = Database::in_memory().unwrap();
        let entry = db.record_export("job-1", "pdf", 1500).unwrap();
        assert!(entry.id.starts_with("EXP"));
        assert!(entry.id[3..].parse::<i64>().is_ok());
    }

    #[test]
    fn test_exports_newest_first() {
        let db = Database::in_memory().unwrap();
        db.record_export("job-1", "pdf", 1).unwrap();
        db.record_export("job-2", "xlsx", 2).unwrap();

        let exports = db.list_exports().unwrap();
        assert_eq!(exports[0].job_id, "job-2");
        assert_eq!(exports[1].job_id, "job-1");
    }

    #[test]
    fn test_export_history_is_capped_at_fifty() {
        let db = Database::in_memory().unwrap();
        for i in 0..55u64 {
            db.record_export(&format!("job-{}", i), "pdf", i).unwrap();
        }

        let exports = db.list_exports().unwrap();
        assert_eq!(exports.len(), 50);
        assert_eq!(exports[0].job_id, "job-54");
        assert_eq!(exports[49].job_id, "job-5");
    }
}
