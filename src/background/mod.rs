//! Periodic background work.

pub mod refresh;

pub use refresh::{BackgroundRefresher, RefreshOutcome, REFRESH_INTERVAL};
