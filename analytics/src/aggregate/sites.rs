//! Per-site tallies and the site-level summaries derived from them.

use std::collections::HashMap;

use serde::Serialize;

use super::{counts::RiskCounts, round_to};
use crate::model::ViolationRecord;

/// Raw per-site counts. `attributed` includes records with unrecognized risk levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SiteTally {
    pub site: String,
    pub counts: RiskCounts,
    pub attributed: u64,
}

/// Group records by site in first-seen order. Records without a site are dropped.
pub(crate) fn tally_sites<'a, I>(records: I) -> Vec<SiteTally>
where
    I: IntoIterator<Item = &'a ViolationRecord>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut tallies: Vec<SiteTally> = Vec::new();

    for record in records {
        let Some(site) = record.site() else {
            continue;
        };

        let slot = *index.entry(site).or_insert_with(|| {
            tallies.push(SiteTally {
                site: site.to_string(),
                counts: RiskCounts::default(),
                attributed: 0,
            });
            tallies.len() - 1
        });

        let tally = &mut tallies[slot];
        tally.attributed += 1;
        if let Some(level) = record.risk_level() {
            tally.counts.increment(level);
        }
    }

    tallies
}

/// Severity-weighted risk view of one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRiskProfile {
    pub site: String,
    pub total: u64,
    pub breakdown: RiskCounts,
    /// `(0·compliant + 50·medium + 100·high) / total`, one decimal.
    pub risk_score: f64,
}

/// Sites ordered by high-risk count, most first. Ties keep first-seen order.
pub fn site_risk_profiles<'a, I>(records: I) -> Vec<SiteRiskProfile>
where
    I: IntoIterator<Item = &'a ViolationRecord>,
{
    let mut profiles: Vec<SiteRiskProfile> = tally_sites(records)
        .into_iter()
        .map(|tally| {
            let risk_score = if tally.attributed == 0 {
                0.0
            } else {
                let weighted = 50 * tally.counts.medium + 100 * tally.counts.high;
                round_to(weighted as f64 / tally.attributed as f64, 1)
            };
            SiteRiskProfile {
                site: tally.site,
                total: tally.attributed,
                breakdown: tally.counts,
                risk_score,
            }
        })
        .collect();

    profiles.sort_by(|a, b| b.breakdown.high.cmp(&a.breakdown.high));
    profiles
}

/// Share of a site's records that were compliant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteComplianceRate {
    pub site: String,
    pub total: u64,
    pub compliant: u64,
    /// Percentage, two decimals.
    pub rate: f64,
}

pub fn compliance_rates<'a, I>(records: I) -> Vec<SiteComplianceRate>
where
    I: IntoIterator<Item = &'a ViolationRecord>,
{
    tally_sites(records)
        .into_iter()
        .map(|tally| {
            let rate = if tally.attributed == 0 {
                0.0
            } else {
                round_to(tally.counts.compliant as f64 / tally.attributed as f64 * 100.0, 2)
            };
            SiteComplianceRate {
                site: tally.site,
                total: tally.attributed,
                compliant: tally.counts.compliant,
                rate,
            }
        })
        .collect()
}
