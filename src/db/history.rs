use chrono::{DateTime, Utc};
use crate::errors::RepurposeError;
use crate::models::{HistoryStats, JobHistoryEntry};
use super::Database;

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepurposeError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepurposeError::Database(format!("Bad timestamp '{}': {}", raw, e)))
}

impl Database {
    /// Record a job summary. An existing id is updated in place and keeps its
    /// position; a new id goes to the front. The list is then capped.
    pub fn record_job(&self, entry: &JobHistoryEntry) -> Result<(), RepurposeError> {
        let conn = self.lock()?;
        let timestamp = entry.timestamp.to_rfc3339();
        let params = rusqlite::params![
            entry.id,
            entry.query,
            timestamp,
            entry.candidates_count,
            entry.status,
        ];

        let updated = conn.execute(
            "UPDATE job_history SET query = ?2, timestamp = ?3, candidates_count = ?4, status = ?5 WHERE id = ?1",
            params,
        ).map_err(|e| RepurposeError::Database(format!("Update failed: {}", e)))?;

        if updated == 0 {
            conn.execute(
                "INSERT INTO job_history (id, query, timestamp, candidates_count, status, position)
                 VALUES (?1, ?2, ?3, ?4, ?5, (SELECT COALESCE(MAX(position), 0) + 1 FROM job_history))",
                params,
            ).map_err(|e| RepurposeError::Database(format!("Insert failed: {}", e)))?;
        }

        conn.execute(
            "DELETE FROM job_history WHERE id NOT IN (SELECT id FROM job_history ORDER BY position DESC LIMIT ?1)",
            rusqlite::params![self.limits.max_jobs as i64],
        ).map_err(|e| RepurposeError::Database(format!("Trim failed: {}", e)))?;

        Ok(())
    }

    /// Job history, front of the list first.
    pub fn list_jobs(&self) -> Result<Vec<JobHistoryEntry>, RepurposeError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, query, timestamp, candidates_count, status FROM job_history ORDER BY position DESC"
        ).map_err(|e| RepurposeError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt.query_map([], |row: &rusqlite::Row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, String>(4)?,
            ))
        }).map_err(|e| RepurposeError::Database(format!("Query error: {}", e)))?;

        let mut jobs = Vec::new();
        for row in rows {
            let (id, query, timestamp, candidates_count, status) =
                row.map_err(|e| RepurposeError::Database(format!("Row error: {}", e)))?;
            jobs.push(JobHistoryEntry {
                id,
                query,
                timestamp: parse_timestamp(&timestamp)?,
                candidates_count,
                status,
            });
        }
        Ok(jobs)
    }

    pub fn history_stats(&self) -> Result<HistoryStats, RepurposeError> {
        let jobs = self.list_jobs()?;
        let exports = self.list_exports()?;

        // Ties go to the format seen first in the newest-first list.
        let mut counts: Vec<(String, usize)> = Vec::new();
        for export in &exports {
            match counts.iter_mut().find(|(format, _)| *format == export.format) {
                Some((_, n)) => *n += 1,
                None => counts.push((export.format.clone(), 1)),
            }
        }
        let most_exported_format = counts
            .iter()
            .fold(None::<&(String, usize)>, |best, candidate| match best {
                Some(b) if b.1 >= candidate.1 => Some(b),
                _ => Some(candidate),
            })
            .map(|(format, _)| format.clone());

        Ok(HistoryStats {
            total_jobs: jobs.len(),
            total_exports: exports.len(),
            recent_activity: jobs.first().map(|j| j.timestamp),
            most_exported_format,
        })
    }

    /// Remove both history lists. Preferences are kept.
    pub fn clear_history(&self) -> Result<(), RepurposeError> {
        let conn = self.lock()?;
        conn.execute_batch("DELETE FROM job_history; DELETE FROM export_history;")
            .map_err(|e| RepurposeError::Database(format!("Delete failed: {}", e)))?;
        Ok(())
    }
}
