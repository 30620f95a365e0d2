//! Dashboard configuration: the scoring policy and an optional default filter.
//!
//! Loaded from JSON. Every field is optional; omitted fields fall back to the
//! built-in policy (compliant 3, medium 2, high 1) and an unrestricted filter.
//!
//! ```json
//! {
//!   "scoring": { "compliant": 3, "medium": 2, "high": 1 },
//!   "filter": { "from": "2024-01-01", "sites": ["North Yard"], "riskLevel": "high" }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    aggregate::ScoringPolicy,
    error::{AnalyticsError, Result},
    filter::FilterCriteria,
    model::{timestamp::parse_day, RiskLevel},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    pub scoring: ScoringPolicy,
    pub filter: FilterPreset,
}

impl DashboardConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validated()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| AnalyticsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    fn validated(self) -> Result<Self> {
        let scoring = self.scoring.validated()?;
        // Surface bad dates at load time rather than on first use.
        self.filter.to_criteria()?;
        Ok(Self { scoring, ..self })
    }
}

/// Filter selection applied when the dashboard opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterPreset {
    /// `YYYY-MM-DD`, inclusive.
    pub from: Option<String>,
    /// `YYYY-MM-DD`, inclusive.
    pub to: Option<String>,
    pub sites: Vec<String>,
    pub risk_level: Option<RiskLevel>,
}

impl FilterPreset {
    pub fn to_criteria(&self) -> Result<FilterCriteria> {
        let from = self.from.as_deref().map(day).transpose()?;
        let to = self.to.as_deref().map(day).transpose()?;

        let mut criteria = FilterCriteria::between_days(from, to).with_sites(self.sites.iter().cloned());
        criteria.risk_level = self.risk_level;
        Ok(criteria)
    }
}

fn day(raw: &str) -> Result<time::Date> {
    parse_day(raw).ok_or_else(|| AnalyticsError::InvalidDate {
        value: raw.to_string(),
    })
}
