//! Configuration, persistence, and the shared key-value cache.

pub mod cache;
pub mod config;
pub mod database;
pub mod schema;

pub use cache::{CacheStore, KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use config::{AppConfig, ConfigError, NotificationSettings, ProfileSettings};
pub use database::{Database, DatabaseError, SqliteActivityLog};
