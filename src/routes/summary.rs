//! Cached per-class route summaries.
//!
//! The reminder scheduler and background refresh task share these through
//! the key-value cache. Structured fields are preferred; the free-text
//! summary survives only for the legacy numeric-parse fallback.

use crate::routes::types::RouteOption;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Last-known route data for one class, persisted between refreshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRouteSummary {
    /// When this summary was fetched
    pub fetched_at: DateTime<Local>,
    /// Depart offset of the best (first-ranked) option, in minutes
    pub best_depart_minutes: Option<f64>,
    /// Display labels of all options, best first
    pub option_labels: Vec<String>,
    /// Free-text summary of the best option (legacy fallback input)
    pub summary_text: Option<String>,
}

impl CachedRouteSummary {
    /// Build a summary from a ranked option list. The producer ranks, so
    /// the first option is authoritative for the depart offset.
    pub fn from_options(options: &[RouteOption], fetched_at: DateTime<Local>) -> Self {
        let best = options.first();
        Self {
            fetched_at,
            best_depart_minutes: best.map(|o| o.depart_in_minutes),
            option_labels: options.iter().map(|o| o.label()).collect(),
            summary_text: best.map(|o| {
                if o.summary.is_empty() {
                    o.label()
                } else {
                    o.summary.clone()
                }
            }),
        }
    }

    /// Build a legacy summary carrying only free text.
    pub fn from_text(text: String, fetched_at: DateTime<Local>) -> Self {
        Self {
            fetched_at,
            best_depart_minutes: None,
            option_labels: Vec::new(),
            summary_text: Some(text),
        }
    }

    /// Whether a structured depart offset is available.
    pub fn has_structured_data(&self) -> bool {
        self.best_depart_minutes.is_some()
    }
}
