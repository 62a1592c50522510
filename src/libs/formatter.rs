//! Date, time and duration formatting shared by the stores and the views.
//!
//! ## Storage Formats
//!
//! - Timestamps are local naive date-times written as `%Y-%m-%d %H:%M:%S`
//!   with sub-second precision dropped, so text ordering matches time order.
//! - Dates are written as `%Y-%m-%d`.
//!
//! ## Display Formats
//!
//! - Durations are shown as `HH:MM`, negative durations as `00:00`
//! - Estimated minutes are shown as `45 min` or `1h 30m`
//!
//! ```rust
//! use kitty::libs::formatter::{format_duration, format_minutes};
//! use chrono::Duration;
//!
//! assert_eq!(format_duration(&(Duration::hours(2) + Duration::minutes(30))), "02:30");
//! assert_eq!(format_minutes(90), "1h 30m");
//! ```

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, SubsecRound};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const TIME_FORMAT: &str = "%H:%M";

/// Current local time truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

pub fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn format_time(value: &NaiveDateTime) -> String {
    value.format(TIME_FORMAT).to_string()
}

/// Parses `YYYY-MM-DD HH:MM[:SS]`, also accepting a `T` separator.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
}

pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;

    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}

pub fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, mins) => format!("{} min", mins),
        (hours, 0) => format!("{}h", hours),
        (hours, mins) => format!("{}h {}m", hours, mins),
    }
}
