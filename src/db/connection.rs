use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use crate::errors::RepurposeError;

/// How many entries each history list keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    pub max_jobs: usize,
    pub max_exports: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self { max_jobs: 20, max_exports: 50 }
    }
}

pub struct Database {
    pub(crate) conn: Arc<Mutex<Connection>>,
    pub(crate) limits: HistoryLimits,
}

impl Database {
    pub fn new(path: &str) -> Result<Self, RepurposeError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| RepurposeError::Database(format!("Failed to open database: {}", e)))?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| RepurposeError::Database(format!("Failed to set pragmas: {}", e)))?;

        let db = Self { conn: Arc::new(Mutex::new(conn)), limits: HistoryLimits::default() };
        db.initialize()?;
        Ok(db)
    }

    pub fn in_memory() -> Result<Self, RepurposeError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RepurposeError::Database(format!("Failed to open in-memory db: {}", e)))?;
        let db = Self { conn: Arc::new(Mutex::new(conn)), limits: HistoryLimits::default() };
        db.initialize()?;
        Ok(db)
    }

    pub fn with_limits(mut self, limits: HistoryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> HistoryLimits {
        self.limits
    }

    fn initialize(&self) -> Result<(), RepurposeError> {
        let conn = self.lock()?;
        conn.execute_batch(super::schema::CREATE_TABLES)
            .map_err(|e| RepurposeError::Database(format!("Failed to create tables: {}", e)))?;
        Ok(())
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, RepurposeError> {
        self.conn
            .lock()
            .map_err(|_| RepurposeError::Database("Connection lock poisoned".into()))
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self { conn: self.conn.clone(), limits: self.limits }
    }
}
