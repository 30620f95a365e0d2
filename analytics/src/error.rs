//! Errors raised at the ingestion and configuration boundary. Aggregation
//! itself never fails; malformed fields are excluded where they matter.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("record payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("record payload must be a JSON array, found {found}")]
    NotAnArray { found: &'static str },

    #[error("unrecognized risk level `{0}` (expected compliant, medium or high)")]
    UnknownRiskLevel(String),

    #[error("invalid date `{value}`: expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("scoring policy needs at least one positive weight")]
    InvalidPolicy,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
