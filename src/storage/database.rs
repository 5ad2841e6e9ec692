//! Database operations using rusqlite.

use crate::activity::{ActivityEntry, ActivityLog};
use crate::navigation::mode::WalkingMode;
use crate::storage::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &PathBuf) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Initialize the database schema.
    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.get_schema_version()?;

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    fn get_schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Run database migrations.
    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            self.conn
                .execute(
                    "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                    [CURRENT_VERSION],
                )
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            tracing::info!("Database migrated to version {}", CURRENT_VERSION);
        }

        Ok(())
    }

    // ========== Activity log ==========

    /// Append one completed walk.
    pub fn insert_activity(&self, entry: &ActivityEntry) -> Result<(), DatabaseError> {
        let mode_json = serde_json::to_string(&entry.walking_mode)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        self.conn
            .execute(
                "INSERT INTO activity_log (id, date, walking_mode, distance_m, step_count,
                 duration_seconds, calories_burned, from_name, to_name, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, datetime('now'))",
                params![
                    Uuid::new_v4().to_string(),
                    entry.date.to_string(),
                    mode_json,
                    entry.distance_m,
                    entry.step_count as i64,
                    entry.duration_seconds as i64,
                    entry.calories_burned,
                    entry.from,
                    entry.to,
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    /// Most recent activity entries, newest first.
    pub fn recent_activities(&self, limit: usize) -> Result<Vec<ActivityEntry>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT date, walking_mode, distance_m, step_count, duration_seconds,
                 calories_burned, from_name, to_name
                 FROM activity_log ORDER BY created_at DESC LIMIT ?1",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            let (date, mode_json, distance_m, steps, duration, calories, from, to) =
                row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

            let date: NaiveDate = date
                .parse()
                .map_err(|_| DatabaseError::SerializationError(format!("bad date '{date}'")))?;
            let walking_mode: WalkingMode = serde_json::from_str(&mode_json)
                .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

            entries.push(ActivityEntry {
                date,
                walking_mode,
                distance_m,
                step_count: steps as u64,
                duration_seconds: duration as u64,
                calories_burned: calories,
                from,
                to,
            });
        }

        Ok(entries)
    }

    // ========== Key-value cache ==========

    /// Read a cached value.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let result: SqliteResult<String> =
            self.conn
                .query_row("SELECT value FROM kv_cache WHERE key = ?1", [key], |row| {
                    row.get(0)
                });

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Write a cached value (last writer wins).
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO kv_cache (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    /// Remove a cached value.
    pub fn kv_remove(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv_cache WHERE key = ?1", [key])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Ok(())
    }
}

/// Activity log backed by the shared database handle.
pub struct SqliteActivityLog {
    database: Arc<Mutex<Database>>,
}

impl SqliteActivityLog {
    pub fn new(database: Arc<Mutex<Database>>) -> Self {
        Self { database }
    }
}

impl ActivityLog for SqliteActivityLog {
    fn append(&self, entry: &ActivityEntry) -> Result<(), DatabaseError> {
        let guard = self
            .database
            .lock()
            .map_err(|e| DatabaseError::QueryFailed(format!("database lock failed: {e}")))?;
        guard.insert_activity(entry)
    }

    fn recent(&self, limit: usize) -> Result<Vec<ActivityEntry>, DatabaseError> {
        let guard = self
            .database
            .lock()
            .map_err(|e| DatabaseError::QueryFailed(format!("database lock failed: {e}")))?;
        guard.recent_activities(limit)
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}
