//! Timestamp parsing for ingested records.
//!
//! The detection backend has shipped a few shapes over time: full RFC 3339
//! instants, naive `date time` pairs split across two fields, and bare dates.
//! Naive values are taken as UTC. Anything else stays unparsed and the record
//! is treated as having no usable instant.

use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

/// Parse a raw timestamp; `None` on any unsupported or malformed shape.
pub fn parse_instant(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(instant);
    }

    let naive = PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            raw,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        )
    });
    if let Ok(naive) = naive {
        return Some(naive.assume_utc());
    }

    parse_day(raw).map(|day| day.midnight().assume_utc())
}

/// Parse a `YYYY-MM-DD` calendar day.
pub fn parse_day(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Join split `date` / `time` fields the way the backend emits them.
pub(crate) fn join_date_time(date: &str, time: Option<&str>) -> String {
    let date = date.trim();
    match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(time) => format!("{date}T{time}"),
        None => date.to_string(),
    }
}
