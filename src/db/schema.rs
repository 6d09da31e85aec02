pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS job_history (
    id TEXT PRIMARY KEY,
    query TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    candidates_count INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'completed',
    position INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS export_history (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL,
    job_id TEXT NOT NULL,
    format TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    size_bytes INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_job_history_position ON job_history(position);
CREATE INDEX IF NOT EXISTS idx_export_history_job ON export_history(job_id);
";
