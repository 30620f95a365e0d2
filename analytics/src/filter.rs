//! Filter engine: conjunctive date / site / risk predicates over the record store.

use std::collections::BTreeSet;

use serde::Serialize;
use time::{macros::time, Date, OffsetDateTime};

use crate::model::{RiskLevel, ViolationRecord};

/// User-selected filter state. Every field left unset (or empty) imposes no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Inclusive lower bound on the detection instant.
    pub from: Option<OffsetDateTime>,
    /// Inclusive upper bound on the detection instant.
    pub to: Option<OffsetDateTime>,
    pub sites: BTreeSet<String>,
    pub risk_level: Option<RiskLevel>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole-day bounds in UTC: `from` at midnight through the last instant of `to`.
    pub fn between_days(from: Option<Date>, to: Option<Date>) -> Self {
        Self::default().with_days(from, to)
    }

    pub fn with_days(mut self, from: Option<Date>, to: Option<Date>) -> Self {
        self.from = from.map(|day| day.midnight().assume_utc());
        self.to = to.map(|day| day.with_time(time!(23:59:59.999_999_999)).assume_utc());
        self
    }

    pub fn with_from(mut self, from: OffsetDateTime) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: OffsetDateTime) -> Self {
        self.to = Some(to);
        self
    }

    /// Sites are trimmed the same way ingested sites are; blank names are dropped.
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        let site = site.into();
        let trimmed = site.trim();
        if !trimmed.is_empty() {
            self.sites.insert(trimmed.to_string());
        }
        self
    }

    pub fn with_sites<I, S>(self, sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        sites.into_iter().fold(self, |criteria, site| criteria.with_site(site))
    }

    pub fn with_risk_level(mut self, level: RiskLevel) -> Self {
        self.risk_level = Some(level);
        self
    }

    /// True when at least one predicate restricts the result.
    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some() || !self.sites.is_empty() || self.risk_level.is_some()
    }

    pub fn matches(&self, record: &ViolationRecord) -> bool {
        self.matches_dates(record) && self.matches_site(record) && self.matches_risk(record)
    }

    fn matches_dates(&self, record: &ViolationRecord) -> bool {
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        // Records without a usable instant cannot satisfy an active date bound.
        let Some(ts) = record.timestamp else {
            return false;
        };
        self.from.map_or(true, |from| ts >= from) && self.to.map_or(true, |to| ts <= to)
    }

    fn matches_site(&self, record: &ViolationRecord) -> bool {
        self.sites.is_empty()
            || record
                .site()
                .map_or(false, |site| self.sites.contains(site))
    }

    fn matches_risk(&self, record: &ViolationRecord) -> bool {
        match self.risk_level {
            None => true,
            Some(level) => record.risk_level() == Some(level),
        }
    }
}

/// Stable filter: keeps input order and borrows from the store.
pub fn filter<'a>(records: &'a [ViolationRecord], criteria: &FilterCriteria) -> Vec<&'a ViolationRecord> {
    records.iter().filter(|record| criteria.matches(record)).collect()
}

/// Values offered by the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub sites: Vec<String>,
    pub risk_levels: Vec<RiskLevel>,
}

/// Distinct sites and recognized risk levels, in first-seen order.
pub fn filter_options<'a, I>(records: I) -> FilterOptions
where
    I: IntoIterator<Item = &'a ViolationRecord>,
{
    let mut options = FilterOptions::default();
    let mut seen_sites = BTreeSet::new();

    for record in records {
        if let Some(site) = record.site() {
            if seen_sites.insert(site) {
                options.sites.push(site.to_string());
            }
        }
        if let Some(level) = record.risk_level() {
            if !options.risk_levels.contains(&level) {
                options.risk_levels.push(level);
            }
        }
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawViolation;
    use time::macros::{date, datetime};

    fn record(id: i64, ts: &str, site: Option<&str>, risk: &str) -> ViolationRecord {
        RawViolation::new(id, ts, site, risk).normalize().unwrap()
    }

    fn sample() -> Vec<ViolationRecord> {
        vec![
            record(1, "2024-01-01T08:00:00Z", Some("A"), "High"),
            record(2, "2024-01-01T17:00:00Z", Some("A"), "Compliant"),
            record(3, "2024-01-02T09:00:00Z", Some("B"), "Medium"),
            record(4, "garbled", Some("B"), "High"),
            record(5, "2024-01-03T12:00:00Z", None, "Unknown"),
        ]
    }

    fn ids(view: &[&ViolationRecord]) -> Vec<String> {
        view.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn empty_criteria_is_identity() {
        let records = sample();
        let view = filter(&records, &FilterCriteria::new());
        assert_eq!(ids(&view), ["1", "2", "3", "4", "5"]);
        assert!(!FilterCriteria::new().is_active());
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let records = sample();
        let criteria = FilterCriteria::new()
            .with_from(datetime!(2024-01-01 17:00:00 UTC))
            .with_to(datetime!(2024-01-02 09:00:00 UTC));
        assert_eq!(ids(&filter(&records, &criteria)), ["2", "3"]);
    }

    #[test]
    fn unparsable_timestamps_drop_out_only_under_date_filters() {
        let records = sample();
        let by_site = FilterCriteria::new().with_site("B");
        assert_eq!(ids(&filter(&records, &by_site)), ["3", "4"]);

        let open_ended = FilterCriteria::new().with_from(datetime!(2000-01-01 00:00:00 UTC));
        assert!(!ids(&filter(&records, &open_ended)).contains(&"4".to_string()));
    }

    #[test]
    fn whole_day_bounds_cover_the_last_instant() {
        let records = sample();
        let criteria = FilterCriteria::between_days(Some(date!(2024 - 01 - 01)), Some(date!(2024 - 01 - 01)));
        assert_eq!(ids(&filter(&records, &criteria)), ["1", "2"]);
    }

    #[test]
    fn predicates_combine_with_and() {
        let records = sample();
        let criteria = FilterCriteria::new()
            .with_sites(["A", "B"])
            .with_risk_level(RiskLevel::High);
        assert_eq!(ids(&filter(&records, &criteria)), ["1", "4"]);

        let none = criteria.with_days(Some(date!(2024 - 01 - 02)), None);
        assert_eq!(ids(&filter(&records, &none)), Vec::<String>::new());
    }

    #[test]
    fn site_names_are_trimmed() {
        let records = vec![record(1, "2024-01-01T08:00:00Z", Some("  North Yard "), "High")];
        let criteria = FilterCriteria::new().with_sites([" North Yard", "   "]);
        assert_eq!(criteria.sites.len(), 1);
        assert_eq!(ids(&filter(&records, &criteria)), ["1"]);
    }

    #[test]
    fn site_filter_excludes_unknown_sites() {
        let records = sample();
        let criteria = FilterCriteria::new().with_site("A");
        assert!(filter(&records, &criteria).iter().all(|r| r.site() == Some("A")));
    }

    #[test]
    fn options_are_first_seen_and_distinct() {
        let records = sample();
        let options = filter_options(&records);
        assert_eq!(options.sites, ["A", "B"]);
        assert_eq!(
            options.risk_levels,
            [RiskLevel::High, RiskLevel::Compliant, RiskLevel::Medium]
        );
    }
}
