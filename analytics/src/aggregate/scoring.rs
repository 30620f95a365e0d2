//! Weighted per-site compliance scoring.
//!
//! Each recognized record contributes its level's weight; the sum is
//! normalized against the best case (every record at the maximum weight):
//!
//! ```text
//! score = Σ count[level] · weight[level] / (instances · max_weight) · 100
//! ```
//!
//! With the default table (compliant 3, medium 2, high 1) an all-compliant
//! site scores 100 and an all-high site scores 33.33.

use serde::{Deserialize, Serialize};

use super::{sites::tally_sites, RiskCounts};
use crate::{
    error::{AnalyticsError, Result},
    model::{RiskLevel, ViolationRecord},
};

/// Business policy mapping each risk level to a weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub compliant: u32,
    pub medium: u32,
    pub high: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            compliant: 3,
            medium: 2,
            high: 1,
        }
    }
}

impl ScoringPolicy {
    pub fn new(compliant: u32, medium: u32, high: u32) -> Result<Self> {
        Self {
            compliant,
            medium,
            high,
        }
        .validated()
    }

    /// Reject tables that cannot normalize (all weights zero).
    pub fn validated(self) -> Result<Self> {
        if self.max_weight() == 0 {
            return Err(AnalyticsError::InvalidPolicy);
        }
        Ok(self)
    }

    pub fn weight(&self, level: RiskLevel) -> u32 {
        match level {
            RiskLevel::Compliant => self.compliant,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
        }
    }

    pub fn max_weight(&self) -> u32 {
        self.compliant.max(self.medium).max(self.high)
    }

    /// Score for one site's counts, in `[0, 100]` and rounded to two decimals.
    pub fn score(&self, counts: &RiskCounts) -> f64 {
        let instances = counts.total();
        let max_weight = self.max_weight();
        if instances == 0 || max_weight == 0 {
            return 0.0;
        }

        let weighted: u64 = counts
            .iter()
            .map(|(level, count)| count * u64::from(self.weight(level)))
            .sum();
        let ratio = weighted as f64 / (instances as f64 * f64::from(max_weight));
        super::round_to(ratio * 100.0, 2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteScore {
    pub site: String,
    pub score: f64,
}

/// Compliance score per distinct site, using the default weighting table.
pub fn score_by_site<'a, I>(records: I) -> Vec<SiteScore>
where
    I: IntoIterator<Item = &'a ViolationRecord>,
{
    score_by_site_with(records, &ScoringPolicy::default())
}

/// Compliance score per distinct site in first-seen order. Records without a
/// site are skipped; a site whose records all carry unrecognized levels scores 0.
pub fn score_by_site_with<'a, I>(records: I, policy: &ScoringPolicy) -> Vec<SiteScore>
where
    I: IntoIterator<Item = &'a ViolationRecord>,
{
    tally_sites(records)
        .into_iter()
        .map(|tally| SiteScore {
            score: policy.score(&tally.counts),
            site: tally.site,
        })
        .collect()
}
