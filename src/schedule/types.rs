//! Class definitions and schedule queries.

use crate::geo::Coordinate;
use chrono::{DateTime, Datelike, Local, NaiveTime, TimeZone, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Weekday codes accepted in class definitions.
pub const VALID_DAYS: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

/// Validation errors for class definitions.
#[derive(Debug, Error)]
pub enum ClassError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("invalid day '{0}', use MON, TUE, WED, THU, FRI, SAT, SUN")]
    InvalidDay(String),

    #[error("at least one day must be provided")]
    NoDays,

    #[error("start time must be HH:MM (24-hour), e.g. 09:30 or 14:00")]
    InvalidStartTime,

    #[error("provide a building id or destination coordinates, not both")]
    AmbiguousDestination,

    #[error("provide a building id or destination coordinates")]
    MissingDestination,
}

/// Where a class meets: a known campus building or raw coordinates
/// (e.g. from an address search).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Destination {
    /// Campus building reference, resolved by the recommendation service
    Building { building_id: String },
    /// Raw coordinates with an optional display name
    Point {
        coordinate: Coordinate,
        name: Option<String>,
    },
}

impl Destination {
    /// Display name for notification bodies and the activity log.
    pub fn display_name(&self) -> &str {
        match self {
            Destination::Building { building_id } => building_id,
            Destination::Point { name, .. } => name.as_deref().unwrap_or("your destination"),
        }
    }
}

/// One class in the user's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Stable identifier, also the reminder key suffix
    pub class_id: String,
    /// Display title
    pub title: String,
    /// Weekday codes this class occurs on
    pub days_of_week: Vec<String>,
    /// Local start time
    pub start_time_local: NaiveTime,
    /// Where the class meets
    pub destination: Destination,
}

impl ClassInfo {
    /// Create a validated class with a fresh id.
    pub fn new(
        title: &str,
        days_of_week: &[&str],
        start_time_local: &str,
        destination: Destination,
    ) -> Result<Self, ClassError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ClassError::EmptyTitle);
        }
        if days_of_week.is_empty() {
            return Err(ClassError::NoDays);
        }

        let mut days = Vec::with_capacity(days_of_week.len());
        for day in days_of_week {
            let code = day.trim().to_uppercase();
            if !VALID_DAYS.contains(&code.as_str()) {
                return Err(ClassError::InvalidDay(code));
            }
            days.push(code);
        }

        let start_time_local = parse_start_time(start_time_local)?;

        Ok(Self {
            class_id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            days_of_week: days,
            start_time_local,
            destination,
        })
    }

    /// Whether this class occurs on the given weekday.
    pub fn occurs_on(&self, weekday: Weekday) -> bool {
        self.days_of_week
            .iter()
            .any(|d| d == weekday_code(weekday))
    }

    /// Start of this class on the date of `now`, in local time.
    pub fn start_on_day(&self, now: DateTime<Local>) -> DateTime<Local> {
        // DST gaps resolve to the earliest valid instant
        Local
            .from_local_datetime(&now.date_naive().and_time(self.start_time_local))
            .earliest()
            .unwrap_or(now)
    }
}

/// Map a chrono weekday to its schedule code.
pub fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

/// Parse an `H:MM` / `HH:MM` 24-hour start time.
fn parse_start_time(value: &str) -> Result<NaiveTime, ClassError> {
    let value = value.trim();
    let (hours, minutes) = value.split_once(':').ok_or(ClassError::InvalidStartTime)?;
    if minutes.len() != 2 || hours.is_empty() || hours.len() > 2 {
        return Err(ClassError::InvalidStartTime);
    }
    let hours: u32 = hours.parse().map_err(|_| ClassError::InvalidStartTime)?;
    let minutes: u32 = minutes.parse().map_err(|_| ClassError::InvalidStartTime)?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or(ClassError::InvalidStartTime)
}

/// Classes occurring on the weekday of `now`, in start-time order.
pub fn classes_today(classes: &[ClassInfo], now: DateTime<Local>) -> Vec<&ClassInfo> {
    let mut today: Vec<&ClassInfo> = classes
        .iter()
        .filter(|c| c.occurs_on(now.weekday()))
        .collect();
    today.sort_by_key(|c| c.start_time_local);
    today
}

/// The next class today that has not started yet.
pub fn next_class_today(classes: &[ClassInfo], now: DateTime<Local>) -> Option<&ClassInfo> {
    classes_today(classes, now)
        .into_iter()
        .find(|c| c.start_on_day(now) > now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest() -> Destination {
        Destination::Building {
            building_id: "siebel".to_string(),
        }
    }

    fn class(title: &str, days: &[&str], start: &str) -> ClassInfo {
        ClassInfo::new(title, days, start, dest()).unwrap()
    }

    #[test]
    fn test_valid_class() {
        let c = class("CS 225", &["MON", "wed", "FRI"], "14:30");
        assert_eq!(c.days_of_week, vec!["MON", "WED", "FRI"]);
        assert_eq!(c.start_time_local, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
    }

    #[test]
    fn test_single_digit_hour() {
        let c = class("CS 225", &["MON"], "9:05");
        assert_eq!(c.start_time_local, NaiveTime::from_hms_opt(9, 5, 0).unwrap());
    }

    #[test]
    fn test_empty_title_rejected() {
        let err = ClassInfo::new("  ", &["MON"], "09:00", dest()).unwrap_err();
        assert!(matches!(err, ClassError::EmptyTitle));
    }

    #[test]
    fn test_bad_day_rejected() {
        let err = ClassInfo::new("CS 225", &["MONDAY"], "09:00", dest()).unwrap_err();
        assert!(matches!(err, ClassError::InvalidDay(_)));
    }

    #[test]
    fn test_bad_time_rejected() {
        for t in ["25:00", "9:5", "nine", "09:60", ""] {
            assert!(
                ClassInfo::new("CS 225", &["MON"], t, dest()).is_err(),
                "accepted {t:?}"
            );
        }
    }

    #[test]
    fn test_occurs_on() {
        let c = class("CS 225", &["MON", "WED"], "09:00");
        assert!(c.occurs_on(Weekday::Mon));
        assert!(!c.occurs_on(Weekday::Tue));
    }

    #[test]
    fn test_next_class_today() {
        // 2025-03-03 is a Monday
        let now = Local.with_ymd_and_hms(2025, 3, 3, 10, 0, 0).unwrap();
        let classes = vec![
            class("Early", &["MON"], "09:00"),
            class("Next", &["MON"], "11:00"),
            class("Later", &["MON"], "15:00"),
            class("Other day", &["TUE"], "10:30"),
        ];
        let next = next_class_today(&classes, now).unwrap();
        assert_eq!(next.title, "Next");
    }

    #[test]
    fn test_no_next_class_after_last() {
        let now = Local.with_ymd_and_hms(2025, 3, 3, 20, 0, 0).unwrap();
        let classes = vec![class("Early", &["MON"], "09:00")];
        assert!(next_class_today(&classes, now).is_none());
    }
}
