//! Aggregation engine. Each summary is an independent pure function over a
//! (possibly filtered) record view; nothing here keeps state between calls.

mod counts;
mod scoring;
mod sites;
mod trend;

pub use counts::{count_by_risk, risk_distribution, RiskCounts, RiskDistribution};
pub use scoring::{score_by_site, score_by_site_with, ScoringPolicy, SiteScore};
pub use sites::{compliance_rates, site_risk_profiles, SiteComplianceRate, SiteRiskProfile};
pub use trend::{trend_by_day, trend_by_time_of_day, SlotBreakdown, TimeSlot, TrendPoint};

/// Round half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
