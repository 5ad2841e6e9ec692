//! Activity log entries for completed walks.

use crate::navigation::mode::WalkingMode;
use crate::navigation::session::SessionSnapshot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One completed trip, persisted when a session reaches ARRIVED.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Local date of the walk
    pub date: NaiveDate,
    /// Walking mode the session ran under
    pub walking_mode: WalkingMode,
    /// Total walked distance in meters
    pub distance_m: f64,
    /// Final step count
    pub step_count: u64,
    /// Trip duration in seconds
    pub duration_seconds: u64,
    /// Estimated calories
    pub calories_burned: f64,
    /// Origin description
    pub from: String,
    /// Destination description
    pub to: String,
}

impl ActivityEntry {
    /// Build an entry from a frozen session snapshot.
    pub fn from_snapshot(
        snapshot: &SessionSnapshot,
        date: NaiveDate,
        from: String,
        to: String,
    ) -> Self {
        Self {
            date,
            walking_mode: snapshot.mode,
            distance_m: snapshot.distance_m,
            step_count: snapshot.step_count,
            duration_seconds: snapshot.duration_seconds,
            calories_burned: snapshot.calories_kcal,
            from,
            to,
        }
    }
}

/// Append-only activity persistence.
///
/// History queries beyond a recent listing live outside this core.
pub trait ActivityLog: Send + Sync {
    /// Append one completed entry.
    fn append(&self, entry: &ActivityEntry) -> Result<(), crate::storage::DatabaseError>;

    /// Most recent entries, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<ActivityEntry>, crate::storage::DatabaseError>;
}

/// In-memory activity log for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryActivityLog {
    entries: std::sync::Mutex<Vec<ActivityEntry>>,
}

impl MemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActivityLog for MemoryActivityLog {
    fn append(&self, entry: &ActivityEntry) -> Result<(), crate::storage::DatabaseError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<ActivityEntry>, crate::storage::DatabaseError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().rev().take(limit).cloned().collect())
    }
}
