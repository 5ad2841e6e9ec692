//! ClassWalk - Campus Walking Navigation Engine
//!
//! Headless entry point: wires configuration, storage, the API client,
//! and the background refresh registration, then runs until interrupted.

use std::sync::{Arc, Mutex};

use classwalk::api::ApiClient;
use classwalk::background::{BackgroundRefresher, REFRESH_INTERVAL};
use classwalk::clock::SystemClock;
use classwalk::notify::InMemoryNotifier;
use classwalk::storage::{self, CacheStore, Database, SqliteKeyValueStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ClassWalk v{}", env!("CARGO_PKG_VERSION"));

    let config = storage::config::load_config()?;
    let database = Arc::new(Mutex::new(Database::open(
        &config.data_dir.join("classwalk.db"),
    )?));
    let cache = CacheStore::new(Arc::new(SqliteKeyValueStore::new(database.clone())));

    // Seed runtime settings from the config file on first run
    cache.set_notification_settings(&config.notifications);

    let api = match ApiClient::new(config.api.base_url.clone()) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!(error = %e, "API client unavailable, running from cache only");
            None
        }
    };

    // Explicit background registration; the task carries its injected
    // clock, cache, client, and notifier rather than ambient globals.
    let refresher = Arc::new(BackgroundRefresher::new(
        Arc::new(SystemClock),
        cache,
        api,
        Arc::new(InMemoryNotifier::new()),
        config.profile.clone(),
    ));
    let handle = refresher.spawn(REFRESH_INTERVAL);

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    handle.abort();

    Ok(())
}
