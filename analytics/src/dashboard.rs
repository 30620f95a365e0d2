//! Dashboard pipeline: record store -> filter -> aggregates.
//!
//! The store is replaced wholesale when records load and the criteria are
//! replaced whenever a filter control changes. Either event drops the
//! memoized snapshot; the next read recomputes everything from scratch.

use once_cell::unsync::OnceCell;
use serde::Serialize;
use tracing::{debug, debug_span};

use crate::{
    aggregate::{
        compliance_rates, count_by_risk, risk_distribution, score_by_site_with,
        site_risk_profiles, trend_by_day, trend_by_time_of_day, RiskCounts, RiskDistribution,
        ScoringPolicy, SiteComplianceRate, SiteRiskProfile, SiteScore, SlotBreakdown, TrendPoint,
    },
    filter::{filter_options, FilterCriteria, FilterOptions},
    model::ViolationRecord,
};

/// Everything the dashboard renders for one (records, criteria) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Store positions of the records passing the filter, in store order.
    #[serde(skip)]
    pub matched: Vec<usize>,
    pub total_records: usize,
    pub matched_records: usize,
    pub risk_counts: RiskCounts,
    pub risk_distribution: RiskDistribution,
    pub site_scores: Vec<SiteScore>,
    pub trend: Vec<TrendPoint>,
    pub time_of_day: [SlotBreakdown; 4],
    pub site_risk: Vec<SiteRiskProfile>,
    pub compliance_rates: Vec<SiteComplianceRate>,
}

impl DashboardSnapshot {
    pub fn compute(records: &[ViolationRecord], criteria: &FilterCriteria, policy: &ScoringPolicy) -> Self {
        let span = debug_span!("dashboard_snapshot", records = records.len());
        let _entered = span.enter();

        let matched: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| criteria.matches(record))
            .map(|(position, _)| position)
            .collect();
        let view: Vec<&ViolationRecord> = matched.iter().map(|&position| &records[position]).collect();

        let snapshot = Self {
            total_records: records.len(),
            matched_records: view.len(),
            risk_counts: count_by_risk(view.iter().copied()),
            risk_distribution: risk_distribution(view.iter().copied()),
            site_scores: score_by_site_with(view.iter().copied(), policy),
            trend: trend_by_day(view.iter().copied()),
            time_of_day: trend_by_time_of_day(view.iter().copied()),
            site_risk: site_risk_profiles(view.iter().copied()),
            compliance_rates: compliance_rates(view.iter().copied()),
            matched,
        };

        debug!(
            matched = snapshot.matched_records,
            sites = snapshot.site_scores.len(),
            days = snapshot.trend.len(),
            "dashboard recomputed"
        );
        snapshot
    }

    pub fn is_empty(&self) -> bool {
        self.matched_records == 0
    }
}

/// Record store plus the active criteria, with the derived snapshot memoized.
#[derive(Debug, Default)]
pub struct Dashboard {
    records: Vec<ViolationRecord>,
    criteria: FilterCriteria,
    policy: ScoringPolicy,
    snapshot: OnceCell<DashboardSnapshot>,
}

impl Dashboard {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn with_records(mut self, records: Vec<ViolationRecord>) -> Self {
        self.load_records(records);
        self
    }

    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.set_criteria(criteria);
        self
    }

    /// "Records loaded" event: replace the store.
    pub fn load_records(&mut self, records: Vec<ViolationRecord>) {
        self.records = records;
        self.snapshot.take();
    }

    /// "Criteria changed" event. Unchanged criteria keep the memoized snapshot.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if self.criteria != criteria {
            self.criteria = criteria;
            self.snapshot.take();
        }
    }

    pub fn set_policy(&mut self, policy: ScoringPolicy) {
        if self.policy != policy {
            self.policy = policy;
            self.snapshot.take();
        }
    }

    pub fn records(&self) -> &[ViolationRecord] {
        &self.records
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        self.snapshot
            .get_or_init(|| DashboardSnapshot::compute(&self.records, &self.criteria, &self.policy))
    }

    /// Current filtered view, in store order.
    pub fn filtered(&self) -> Vec<&ViolationRecord> {
        self.snapshot()
            .matched
            .iter()
            .map(|&position| &self.records[position])
            .collect()
    }

    /// Filter control values, drawn from the full store rather than the filtered view.
    pub fn options(&self) -> FilterOptions {
        filter_options(&self.records)
    }
}
