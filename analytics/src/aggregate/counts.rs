//! Per-risk-level counts and the distribution built on top of them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{RiskLevel, ViolationRecord};

/// One counter per risk level. All three buckets always exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskCounts {
    pub compliant: u64,
    pub medium: u64,
    pub high: u64,
}

impl RiskCounts {
    pub fn get(&self, level: RiskLevel) -> u64 {
        match level {
            RiskLevel::Compliant => self.compliant,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
        }
    }

    pub fn increment(&mut self, level: RiskLevel) {
        let slot = match level {
            RiskLevel::Compliant => &mut self.compliant,
            RiskLevel::Medium => &mut self.medium,
            RiskLevel::High => &mut self.high,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u64 {
        self.compliant + self.medium + self.high
    }

    /// `(level, count)` pairs in chart order.
    pub fn iter(&self) -> impl Iterator<Item = (RiskLevel, u64)> + '_ {
        RiskLevel::ALL.into_iter().map(move |level| (level, self.get(level)))
    }

    pub fn as_map(&self) -> BTreeMap<RiskLevel, u64> {
        self.iter().collect()
    }
}

/// Bucket each record by its normalized risk level. Unrecognized levels are skipped.
pub fn count_by_risk<'a, I>(records: I) -> RiskCounts
where
    I: IntoIterator<Item = &'a ViolationRecord>,
{
    let mut counts = RiskCounts::default();
    for level in records.into_iter().filter_map(ViolationRecord::risk_level) {
        counts.increment(level);
    }
    counts
}

/// Risk counts with proportions, for pie-style rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RiskDistribution {
    pub counts: RiskCounts,
    pub total: u64,
}

impl RiskDistribution {
    /// Fraction of the distribution in `level`, within `[0, 1]`.
    pub fn share(&self, level: RiskLevel) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.counts.get(level) as f64 / self.total as f64
        }
    }

    pub fn percentages(&self) -> BTreeMap<RiskLevel, f64> {
        RiskLevel::ALL
            .into_iter()
            .map(|level| (level, self.share(level) * 100.0))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

pub fn risk_distribution<'a, I>(records: I) -> RiskDistribution
where
    I: IntoIterator<Item = &'a ViolationRecord>,
{
    let counts = count_by_risk(records);
    RiskDistribution {
        total: counts.total(),
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawViolation;

    fn records(levels: &[&str]) -> Vec<ViolationRecord> {
        levels
            .iter()
            .enumerate()
            .map(|(i, level)| {
                RawViolation::new(i as i64, "2024-01-01T00:00:00Z", Some("A"), level)
                    .normalize()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn all_buckets_present_even_when_empty() {
        let counts = count_by_risk(&Vec::<ViolationRecord>::new());
        let map = counts.as_map();
        assert_eq!(map.len(), 3);
        assert!(map.values().all(|count| *count == 0));
    }

    #[test]
    fn unrecognized_levels_do_not_count() {
        let recs = records(&["High", "high", "MEDIUM", "Unknown", ""]);
        let counts = count_by_risk(&recs);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.medium, 1);
        assert_eq!(counts.compliant, 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn distribution_shares_sum_to_one() {
        let recs = records(&["compliant", "compliant", "medium", "high", "bogus"]);
        let dist = risk_distribution(&recs);
        assert_eq!(dist.total, 4);
        assert!((dist.share(RiskLevel::Compliant) - 0.5).abs() < 1e-12);
        let sum: f64 = RiskLevel::ALL.iter().map(|l| dist.share(*l)).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!((dist.percentages()[&RiskLevel::High] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn empty_distribution_has_zero_shares() {
        let dist = risk_distribution(&Vec::<ViolationRecord>::new());
        assert!(dist.is_empty());
        assert_eq!(dist.share(RiskLevel::High), 0.0);
    }
}
