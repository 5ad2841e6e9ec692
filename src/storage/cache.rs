//! Shared last-known cache behind an injected key-value store.
//!
//! Both the live navigation path and the background refresh task read and
//! write here. Values are last-writer-wins; staleness degrades UX, not
//! correctness, so no transactional semantics are needed.

use crate::geo::Coordinate;
use crate::routes::CachedRouteSummary;
use crate::schedule::ClassInfo;
use crate::storage::config::NotificationSettings;
use crate::storage::database::Database;
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

const KEY_LAST_LOCATION: &str = "location:last";
const KEY_CLASSES: &str = "schedule:classes";
const KEY_NOTIFICATION_SETTINGS: &str = "settings:notifications";
const ROUTE_KEY_PREFIX: &str = "route:";
const WALKED_KEY_PREFIX: &str = "walked:";

/// Plain string key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any existing one.
    fn set(&self, key: &str, value: &str);

    /// Remove a value if present.
    fn remove(&self, key: &str);
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}

/// Store backed by the shared database handle.
pub struct SqliteKeyValueStore {
    database: Arc<Mutex<Database>>,
}

impl SqliteKeyValueStore {
    pub fn new(database: Arc<Mutex<Database>>) -> Self {
        Self { database }
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        let guard = self.database.lock().ok()?;
        match guard.kv_get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(guard) = self.database.lock() {
            if let Err(e) = guard.kv_set(key, value) {
                tracing::warn!(key, error = %e, "cache write failed");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(guard) = self.database.lock() {
            if let Err(e) = guard.kv_remove(key) {
                tracing::warn!(key, error = %e, "cache remove failed");
            }
        }
    }
}

/// Typed accessors over the raw store.
#[derive(Clone)]
pub struct CacheStore {
    store: Arc<dyn KeyValueStore>,
}

impl CacheStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Last known device location.
    pub fn last_known_location(&self) -> Option<Coordinate> {
        self.get_json(KEY_LAST_LOCATION)
    }

    pub fn set_last_known_location(&self, location: Coordinate) {
        self.set_json(KEY_LAST_LOCATION, &location);
    }

    /// Cached class list.
    pub fn classes(&self) -> Vec<ClassInfo> {
        self.get_json(KEY_CLASSES).unwrap_or_default()
    }

    pub fn set_classes(&self, classes: &[ClassInfo]) {
        self.set_json(KEY_CLASSES, &classes);
    }

    /// Cached route summary for one class.
    pub fn route_summary(&self, class_id: &str) -> Option<CachedRouteSummary> {
        self.get_json(&format!("{ROUTE_KEY_PREFIX}{class_id}"))
    }

    pub fn set_route_summary(&self, class_id: &str, summary: &CachedRouteSummary) {
        self.set_json(&format!("{ROUTE_KEY_PREFIX}{class_id}"), summary);
    }

    /// All cached route summaries for the given classes.
    pub fn route_summaries(&self, classes: &[ClassInfo]) -> HashMap<String, CachedRouteSummary> {
        classes
            .iter()
            .filter_map(|c| {
                self.route_summary(&c.class_id)
                    .map(|s| (c.class_id.clone(), s))
            })
            .collect()
    }

    /// Classes the user has marked "walking" on the given day.
    pub fn walked_today(&self, date: NaiveDate) -> HashSet<String> {
        self.get_json(&format!("{WALKED_KEY_PREFIX}{date}"))
            .unwrap_or_default()
    }

    /// Mark a class as walking for the given day.
    pub fn mark_walked(&self, date: NaiveDate, class_id: &str) {
        let mut walked = self.walked_today(date);
        walked.insert(class_id.to_string());
        self.set_json(&format!("{WALKED_KEY_PREFIX}{date}"), &walked);
    }

    /// Reminder settings, defaulting when never written.
    pub fn notification_settings(&self) -> NotificationSettings {
        self.get_json(KEY_NOTIFICATION_SETTINGS).unwrap_or_default()
    }

    pub fn set_notification_settings(&self, settings: &NotificationSettings) {
        self.set_json(KEY_NOTIFICATION_SETTINGS, settings);
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable cache entry");
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.store.set(key, &raw),
            Err(e) => tracing::warn!(key, error = %e, "failed to serialize cache entry"),
        }
    }
}
