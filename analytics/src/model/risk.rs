//! Risk levels and the ingestion-time classification of raw labels.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AnalyticsError;

/// Severity classification of a detected event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Compliant,
    Medium,
    High,
}

impl RiskLevel {
    /// Every level in chart order.
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Compliant, RiskLevel::Medium, RiskLevel::High];

    /// Case-insensitive match against the three labels. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
    }

    /// Normalized wire label, as stored by the detection backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Compliant => "compliant",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Label used on chart axes and legends.
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Compliant => "Compliant",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AnalyticsError::UnknownRiskLevel(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unrecognized risk level `{raw}` (expected compliant, medium or high)"
            ))
        })
    }
}

/// Risk field of an ingested record: either one of the known levels or the
/// raw label that failed to normalize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RiskTag {
    Known(RiskLevel),
    Unrecognized(String),
}

impl RiskTag {
    pub fn classify(raw: &str) -> Self {
        match RiskLevel::parse(raw) {
            Some(level) => RiskTag::Known(level),
            None => RiskTag::Unrecognized(raw.to_string()),
        }
    }

    pub fn level(&self) -> Option<RiskLevel> {
        match self {
            RiskTag::Known(level) => Some(*level),
            RiskTag::Unrecognized(_) => None,
        }
    }

    /// Text shown in tables: the normalized label, or the raw input when unrecognized.
    pub fn display(&self) -> &str {
        match self {
            RiskTag::Known(level) => level.as_str(),
            RiskTag::Unrecognized(raw) => raw.as_str(),
        }
    }
}

impl From<RiskLevel> for RiskTag {
    fn from(level: RiskLevel) -> Self {
        RiskTag::Known(level)
    }
}
