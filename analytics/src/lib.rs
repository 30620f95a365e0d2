//! Violation analytics for the PPE compliance dashboard. Everything in here is
//! pure data transformation over an immutable record snapshot; renderers live
//! elsewhere and consume the plain structures this crate returns.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod format;
pub mod model;
pub mod table;

pub use aggregate::{
    compliance_rates, count_by_risk, risk_distribution, score_by_site, score_by_site_with,
    site_risk_profiles, trend_by_day, trend_by_time_of_day, RiskCounts, RiskDistribution,
    ScoringPolicy, SiteComplianceRate, SiteRiskProfile, SiteScore, SlotBreakdown, TimeSlot,
    TrendPoint,
};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use error::{AnalyticsError, Result};
pub use filter::{filter, filter_options, FilterCriteria, FilterOptions};
pub use model::{ingest_json, ingest_value, IngestReport, RawViolation, RecordId, RiskLevel, RiskTag, ViolationRecord};
