//! Time-bucketed series: daily trend and time-of-day breakdown.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use time::Date;

use super::counts::RiskCounts;
use crate::{format::format_day, model::ViolationRecord};

/// Violations observed on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    #[serde(serialize_with = "serialize_day")]
    pub date: Date,
    pub count: u64,
}

impl TrendPoint {
    /// `yyyy-mm-dd` axis label.
    pub fn label(&self) -> String {
        format_day(self.date)
    }
}

fn serialize_day<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_day(*date))
}

/// Count records per calendar day, ascending by date. Days without records are
/// not inserted; records without a parsable timestamp are skipped.
pub fn trend_by_day<'a, I>(records: I) -> Vec<TrendPoint>
where
    I: IntoIterator<Item = &'a ViolationRecord>,
{
    let mut buckets: BTreeMap<Date, u64> = BTreeMap::new();
    for day in records.into_iter().filter_map(ViolationRecord::day) {
        *buckets.entry(day).or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|(date, count)| TrendPoint { date, count })
        .collect()
}

/// Shift buckets used by the time-of-day view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeSlot {
    /// Display order.
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Morning,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
        TimeSlot::Night,
    ];

    pub fn from_hour(hour: u8) -> Self {
        match hour {
            6..=11 => TimeSlot::Morning,
            12..=17 => TimeSlot::Afternoon,
            18..=23 => TimeSlot::Evening,
            _ => TimeSlot::Night,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning (06:00 - 12:00)",
            TimeSlot::Afternoon => "Afternoon (12:00 - 18:00)",
            TimeSlot::Evening => "Evening (18:00 - 00:00)",
            TimeSlot::Night => "Night (00:00 - 06:00)",
        }
    }

    fn position(self) -> usize {
        match self {
            TimeSlot::Morning => 0,
            TimeSlot::Afternoon => 1,
            TimeSlot::Evening => 2,
            TimeSlot::Night => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotBreakdown {
    pub slot: TimeSlot,
    pub counts: RiskCounts,
    /// Every timestamped record in the slot, recognized risk level or not.
    pub total: u64,
}

/// Bucket records by hour of detection (in the timestamp's own offset).
pub fn trend_by_time_of_day<'a, I>(records: I) -> [SlotBreakdown; 4]
where
    I: IntoIterator<Item = &'a ViolationRecord>,
{
    let mut slots = TimeSlot::ALL.map(|slot| SlotBreakdown {
        slot,
        counts: RiskCounts::default(),
        total: 0,
    });

    for record in records {
        let Some(ts) = record.timestamp else {
            continue;
        };
        let bucket = &mut slots[TimeSlot::from_hour(ts.hour()).position()];
        bucket.total += 1;
        if let Some(level) = record.risk_level() {
            bucket.counts.increment(level);
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawViolation, RiskLevel};
    use time::macros::date;

    fn at(id: i64, ts: &str, risk: &str) -> ViolationRecord {
        RawViolation::new(id, ts, Some("A"), risk).normalize().unwrap()
    }

    #[test]
    fn days_are_sorted_regardless_of_input_order() {
        let records = vec![
            at(1, "2024-03-02T10:00:00Z", "high"),
            at(2, "2023-12-31T23:59:59Z", "high"),
            at(3, "2024-03-02T01:00:00Z", "medium"),
            at(4, "2024-01-15", "compliant"),
        ];
        let trend = trend_by_day(&records);
        let days: Vec<_> = trend.iter().map(|p| (p.date, p.count)).collect();
        assert_eq!(
            days,
            [
                (date!(2023 - 12 - 31), 1),
                (date!(2024 - 01 - 15), 1),
                (date!(2024 - 03 - 02), 2),
            ]
        );
        assert_eq!(trend[2].label(), "2024-03-02");
    }

    #[test]
    fn day_follows_the_timestamp_offset() {
        let records = vec![at(1, "2024-01-01T23:30:00-05:00", "high")];
        assert_eq!(trend_by_day(&records)[0].date, date!(2024 - 01 - 01));
    }

    #[test]
    fn unparsable_timestamps_are_skipped_but_unknown_risk_counts() {
        let records = vec![at(1, "nope", "high"), at(2, "2024-01-01T00:00:00Z", "Unknown")];
        let trend = trend_by_day(&records);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].count, 1);
    }

    #[test]
    fn no_gap_filling() {
        let records = vec![
            at(1, "2024-01-01T00:00:00Z", "high"),
            at(2, "2024-01-05T00:00:00Z", "high"),
        ];
        assert_eq!(trend_by_day(&records).len(), 2);
    }

    #[test]
    fn serializes_dates_as_plain_days() {
        let point = TrendPoint {
            date: date!(2024 - 02 - 09),
            count: 4,
        };
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json, serde_json::json!({ "date": "2024-02-09", "count": 4 }));
    }

    #[test]
    fn slot_boundaries() {
        assert_eq!(TimeSlot::from_hour(0), TimeSlot::Night);
        assert_eq!(TimeSlot::from_hour(5), TimeSlot::Night);
        assert_eq!(TimeSlot::from_hour(6), TimeSlot::Morning);
        assert_eq!(TimeSlot::from_hour(12), TimeSlot::Afternoon);
        assert_eq!(TimeSlot::from_hour(18), TimeSlot::Evening);
        assert_eq!(TimeSlot::from_hour(23), TimeSlot::Evening);
    }

    #[test]
    fn time_of_day_keeps_all_slots() {
        let records = vec![
            at(1, "2024-01-01T07:00:00Z", "high"),
            at(2, "2024-01-01T08:00:00Z", "odd"),
            at(3, "2024-01-01T19:00:00Z", "compliant"),
            at(4, "bad", "high"),
        ];
        let slots = trend_by_time_of_day(&records);
        assert_eq!(slots.map(|s| s.slot), TimeSlot::ALL);
        assert_eq!(slots[0].total, 2);
        assert_eq!(slots[0].counts.get(RiskLevel::High), 1);
        assert_eq!(slots[1].total, 0);
        assert_eq!(slots[2].counts.compliant, 1);
        assert_eq!(slots[3].total, 0);
    }
}
