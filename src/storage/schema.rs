//! Database schema definitions.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Completed walks
CREATE TABLE IF NOT EXISTS activity_log (
    id TEXT PRIMARY KEY,
    date TEXT NOT NULL,
    walking_mode TEXT NOT NULL,
    distance_m REAL NOT NULL,
    step_count INTEGER NOT NULL,
    duration_seconds INTEGER NOT NULL,
    calories_burned REAL NOT NULL,
    from_name TEXT NOT NULL,
    to_name TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_activity_log_date ON activity_log(date);

-- Shared last-known cache (location, classes, route summaries,
-- per-day dismissals). Last writer wins.
CREATE TABLE IF NOT EXISTS kv_cache (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Schema version tracking table, created before everything else.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;
