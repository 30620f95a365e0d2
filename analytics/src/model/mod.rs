//! Shared data model: risk levels, violation records and payload ingestion.

mod record;
mod risk;
pub mod timestamp;

pub use record::{ingest_json, ingest_value, IngestReport, RawViolation, RecordId, ViolationRecord};
pub use risk::{RiskLevel, RiskTag};
