//! Formatting helpers for presenting aggregates.

use time::{macros::format_description, Date, OffsetDateTime};

pub fn format_score(value: f64) -> String {
    format!("{value:.2}%")
}

/// Proportion in `[0, 1]` as a one-decimal percentage.
pub fn format_share(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn format_day(date: Date) -> String {
    date.format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "—".to_string())
}

pub fn format_clock(ts: OffsetDateTime) -> String {
    ts.format(&format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_else(|_| "—".to_string())
}
