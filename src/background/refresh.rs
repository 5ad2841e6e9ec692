//! Background route refresh.
//!
//! A periodically invoked unit of work: refresh the next class's cached
//! route from the backend when possible, then re-run the reminder
//! scheduler so alerts reflect either the fresh or the last-known data.
//! Registration is explicit — the host calls [`BackgroundRefresher::spawn`]
//! once at startup with injected capabilities; nothing registers itself
//! at load time.

use crate::api::{ApiClient, RecommendationRequest};
use crate::clock::Clock;
use crate::notify::Notifier;
use crate::reminders::ReminderScheduler;
use crate::routes::CachedRouteSummary;
use crate::schedule::{next_class_today, ClassInfo, Destination};
use crate::storage::{CacheStore, ProfileSettings};
use chrono::SecondsFormat;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Target refresh cadence. The host scheduler may be coarser.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Result of one refresh run, for the host scheduler's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A fresh route summary was fetched and cached
    NewData,
    /// Nothing to do: notifications disabled, no cached inputs, or no
    /// upcoming class to refresh
    NoData,
    /// The route fetch failed; the previous summary was kept
    Failed,
}

/// Recomputes the next class's route and reschedules reminders.
pub struct BackgroundRefresher {
    clock: Arc<dyn Clock>,
    cache: CacheStore,
    api: Option<Arc<ApiClient>>,
    notifier: Arc<dyn Notifier>,
    profile: ProfileSettings,
}

impl BackgroundRefresher {
    pub fn new(
        clock: Arc<dyn Clock>,
        cache: CacheStore,
        api: Option<Arc<ApiClient>>,
        notifier: Arc<dyn Notifier>,
        profile: ProfileSettings,
    ) -> Self {
        Self {
            clock,
            cache,
            api,
            notifier,
            profile,
        }
    }

    /// One refresh pass. Absorbs every failure; never panics or errors
    /// past this boundary.
    pub async fn run(&self) -> RefreshOutcome {
        let settings = self.cache.notification_settings();
        if !settings.class_notifications_enabled {
            tracing::debug!("class notifications disabled, skipping refresh");
            return RefreshOutcome::NoData;
        }

        let classes = self.cache.classes();
        let location = self.cache.last_known_location();
        if classes.is_empty() && location.is_none() {
            tracing::debug!("no cached classes or location, skipping refresh");
            return RefreshOutcome::NoData;
        }

        let now = self.clock.now();
        let mut outcome = RefreshOutcome::NoData;

        if let (Some(next), Some(origin)) = (next_class_today(&classes, now), location) {
            match self.fetch_summary(next, origin.lat, origin.lng).await {
                Some(Ok(summary)) => {
                    self.cache.set_route_summary(&next.class_id, &summary);
                    outcome = RefreshOutcome::NewData;
                }
                Some(Err(())) => {
                    // Keep the previous cached summary
                    outcome = RefreshOutcome::Failed;
                }
                None => {}
            }
        }

        // Reminders always reflect whatever data we now have
        let scheduler = ReminderScheduler::new(self.clock.clone(), settings.buffer_minutes);
        let summaries = self.cache.route_summaries(&classes);
        let walked = self.cache.walked_today(now.date_naive());
        scheduler.run(&classes, &summaries, &walked, self.notifier.as_ref());

        outcome
    }

    /// Register the refresher on a tokio interval. Call once at startup.
    pub fn spawn(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let outcome = self.run().await;
                tracing::debug!(?outcome, "background refresh completed");
            }
        })
    }

    /// Fetch a fresh summary for the next class.
    ///
    /// `None` when no client is configured, `Some(Err(()))` on a fetch
    /// failure.
    async fn fetch_summary(
        &self,
        class: &ClassInfo,
        lat: f64,
        lng: f64,
    ) -> Option<Result<CachedRouteSummary, ()>> {
        let api = self.api.as_ref()?;
        let now = self.clock.now();
        let arrive_by = class.start_on_day(now);

        let (building_id, dest_lat, dest_lng, dest_name) = match &class.destination {
            Destination::Building { building_id } => (building_id.clone(), None, None, None),
            Destination::Point { coordinate, name } => (
                String::new(),
                Some(coordinate.lat),
                Some(coordinate.lng),
                name.clone(),
            ),
        };

        let request = RecommendationRequest {
            lat,
            lng,
            destination_building_id: building_id,
            arrive_by_iso: arrive_by.to_rfc3339_opts(SecondsFormat::Secs, false),
            walking_speed_mps: self.profile.walking_mode.speed_mps(),
            buffer_minutes: self.cache.notification_settings().buffer_minutes as f64,
            max_options: 3,
            destination_lat: dest_lat,
            destination_lng: dest_lng,
            destination_name: dest_name,
        };

        match api.recommendation(&request).await {
            Ok(options) => Some(Ok(CachedRouteSummary::from_options(&options, now))),
            Err(e) => {
                tracing::warn!(class = %class.title, error = %e, "route refresh failed");
                Some(Err(()))
            }
        }
    }
}
