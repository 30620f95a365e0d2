//! Violation records as delivered by the detection backend and as held in the
//! in-memory store after normalization.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::{Date, OffsetDateTime};
use tracing::{debug, warn};

use super::{
    risk::{RiskLevel, RiskTag},
    timestamp::{join_date_time, parse_instant},
};
use crate::error::{AnalyticsError, Result};

/// Opaque record identifier. The backend uses integer keys; other sources send strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId::Text(id)
    }
}

/// One element of the record payload, before normalization.
///
/// Accepts both the backend's column names (`Site_Name`, `Risk_Level`, ...)
/// and camelCase keys. Text fields take any JSON value, not only strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawViolation {
    #[serde(alias = "ID")]
    pub id: Option<RecordId>,
    #[serde(default, alias = "Timestamp", deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,
    #[serde(default, alias = "Date", deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, alias = "Time", deserialize_with = "lenient_text")]
    pub time: Option<String>,
    #[serde(default, alias = "siteName", alias = "Site_Name", deserialize_with = "lenient_text")]
    pub site: Option<String>,
    #[serde(default, alias = "Violation_Type", deserialize_with = "lenient_text")]
    pub violation_type: Option<String>,
    #[serde(default, alias = "Risk_Level", deserialize_with = "lenient_text")]
    pub risk_level: Option<String>,
    #[serde(default, alias = "Image_Reference", deserialize_with = "lenient_text")]
    pub image_reference: Option<String>,
}

/// `null` is absent; a string is kept as is; any other value keeps its JSON
/// text, so a numeric risk label still reaches normalization as a sentinel.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

impl RawViolation {
    pub fn new(id: impl Into<RecordId>, timestamp: &str, site: Option<&str>, risk_level: &str) -> Self {
        Self {
            id: Some(id.into()),
            timestamp: Some(timestamp.to_string()),
            site: site.map(str::to_string),
            risk_level: Some(risk_level.to_string()),
            ..Self::default()
        }
    }

    pub fn with_violation_type(mut self, violation_type: &str) -> Self {
        self.violation_type = Some(violation_type.to_string());
        self
    }

    pub fn with_image_reference(mut self, image_reference: &str) -> Self {
        self.image_reference = Some(image_reference.to_string());
        self
    }

    /// Source text of the detection instant, following the backend's precedence:
    /// an explicit timestamp wins, otherwise `date` joined with `time`.
    fn raw_timestamp(&self) -> String {
        if let Some(ts) = self.timestamp.as_deref().filter(|ts| !ts.trim().is_empty()) {
            return ts.trim().to_string();
        }
        match self.date.as_deref() {
            Some(date) => join_date_time(date, self.time.as_deref()),
            None => String::new(),
        }
    }

    /// Normalize into a store record. Malformed fields are kept as sentinels
    /// rather than rejected.
    pub fn normalize(self) -> Result<ViolationRecord> {
        let raw_timestamp = self.raw_timestamp();
        let id = self.id.ok_or_else(|| {
            AnalyticsError::Payload(<serde_json::Error as serde::de::Error>::missing_field("id"))
        })?;

        let timestamp = parse_instant(&raw_timestamp);
        if timestamp.is_none() {
            debug!(%id, raw = %raw_timestamp, "unparsable timestamp; excluded from date filters and trends");
        }

        let risk = RiskTag::classify(self.risk_level.as_deref().unwrap_or_default());
        if let RiskTag::Unrecognized(raw) = &risk {
            debug!(%id, %raw, "unrecognized risk level; excluded from risk aggregates");
        }

        let site = self
            .site
            .map(|site| site.trim().to_string())
            .filter(|site| !site.is_empty());

        Ok(ViolationRecord {
            id,
            timestamp,
            raw_timestamp,
            site,
            violation_type: self.violation_type.unwrap_or_default(),
            risk,
            image_reference: self.image_reference,
        })
    }
}

/// A detected PPE-compliance event. Never mutated after ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationRecord {
    pub id: RecordId,
    #[serde(with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
    /// Timestamp text as received, kept for display when it failed to parse.
    pub raw_timestamp: String,
    pub site: Option<String>,
    pub violation_type: String,
    #[serde(rename = "riskLevel")]
    pub risk: RiskTag,
    pub image_reference: Option<String>,
}

impl ViolationRecord {
    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.risk.level()
    }

    /// Calendar day of the detection in the timestamp's own offset.
    pub fn day(&self) -> Option<Date> {
        self.timestamp.map(|ts| ts.date())
    }

    pub fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }
}

/// Counters collected while ingesting a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub accepted: usize,
    pub skipped: usize,
    pub unparsed_timestamps: usize,
    pub unrecognized_risk: usize,
}

/// Decode a bulk record payload (a JSON array). Elements that fail to decode
/// are skipped and counted; only a malformed payload as a whole is an error.
pub fn ingest_json(payload: &str) -> Result<(Vec<ViolationRecord>, IngestReport)> {
    let value: Value = serde_json::from_str(payload)?;
    ingest_value(value)
}

pub fn ingest_value(value: Value) -> Result<(Vec<ViolationRecord>, IngestReport)> {
    let elements = match value {
        Value::Array(elements) => elements,
        other => {
            return Err(AnalyticsError::NotAnArray {
                found: json_kind(&other),
            })
        }
    };

    let mut report = IngestReport::default();
    let mut records = Vec::with_capacity(elements.len());

    for (index, element) in elements.into_iter().enumerate() {
        let normalized = serde_json::from_value::<RawViolation>(element)
            .map_err(AnalyticsError::from)
            .and_then(RawViolation::normalize);

        match normalized {
            Ok(record) => {
                if record.timestamp.is_none() {
                    report.unparsed_timestamps += 1;
                }
                if record.risk_level().is_none() {
                    report.unrecognized_risk += 1;
                }
                report.accepted += 1;
                records.push(record);
            }
            Err(err) => {
                warn!(index, error = %err, "skipping undecodable violation record");
                report.skipped += 1;
            }
        }
    }

    Ok((records, report))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::{date, datetime};

    #[test]
    fn backend_columns_are_accepted() {
        let payload = json!([{
            "ID": 7,
            "Date": "2024-01-02",
            "Time": "14:05:00",
            "Site_Name": "North Yard",
            "Image_Reference": "img_007.jpeg",
            "Violation_Type": "No helmet",
            "Risk_Level": "High"
        }]);

        let (records, report) = ingest_value(payload).unwrap();
        assert_eq!(report.accepted, 1);
        let record = &records[0];
        assert_eq!(record.id, RecordId::Int(7));
        assert_eq!(record.timestamp, Some(datetime!(2024-01-02 14:05:00 UTC)));
        assert_eq!(record.site(), Some("North Yard"));
        assert_eq!(record.violation_type, "No helmet");
        assert_eq!(record.risk_level(), Some(RiskLevel::High));
        assert_eq!(record.image_reference.as_deref(), Some("img_007.jpeg"));
    }

    #[test]
    fn camel_case_keys_and_explicit_timestamp() {
        let payload = json!([{
            "id": "evt-1",
            "timestamp": "2024-05-01T23:30:00-04:00",
            "date": "1999-01-01",
            "site": "  ",
            "violationType": "No vest",
            "riskLevel": "medium"
        }]);

        let (records, _) = ingest_value(payload).unwrap();
        let record = &records[0];
        assert_eq!(record.id, RecordId::from("evt-1"));
        assert_eq!(record.day(), Some(date!(2024 - 05 - 01)));
        assert_eq!(record.site, None);
        assert_eq!(record.risk_level(), Some(RiskLevel::Medium));
    }

    #[test]
    fn malformed_fields_are_kept_as_sentinels() {
        let payload = json!([
            { "id": 1, "Date": "not-a-date", "Site_Name": "A", "Risk_Level": "Unknown" },
            { "id": 2, "Site_Name": null, "Risk_Level": null }
        ]);

        let (records, report) = ingest_value(payload).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(report.unparsed_timestamps, 2);
        assert_eq!(report.unrecognized_risk, 2);
        assert_eq!(records[0].raw_timestamp, "not-a-date");
        assert_eq!(records[0].risk, RiskTag::Unrecognized("Unknown".into()));
    }

    #[test]
    fn undecodable_elements_are_skipped() {
        let payload = json!([
            { "id": 1, "Date": "2024-01-01", "Risk_Level": "high" },
            { "Date": "2024-01-01", "Risk_Level": "high" },
            "not an object",
            { "id": [3], "Risk_Level": "high" }
        ]);

        let (records, report) = ingest_value(payload).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.skipped, 3);
    }

    #[test]
    fn non_string_fields_are_kept_as_text() {
        let payload = json!([
            { "ID": 1, "Date": "2024-01-01", "Site_Name": "A", "Risk_Level": "High" },
            { "ID": 2, "Date": "2024-01-02", "Site_Name": 17, "Risk_Level": 3,
              "Violation_Type": false }
        ]);

        let (records, report) = ingest_value(payload).unwrap();
        assert_eq!(report.accepted, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.unrecognized_risk, 1);

        let record = &records[1];
        assert_eq!(record.risk, RiskTag::Unrecognized("3".into()));
        assert_eq!(record.site(), Some("17"));
        assert_eq!(record.violation_type, "false");
        assert_eq!(record.day(), Some(date!(2024 - 01 - 02)));
    }

    #[test]
    fn non_array_payload_is_an_error() {
        let err = ingest_json(r#"{"violations": []}"#).unwrap_err();
        assert!(matches!(err, AnalyticsError::NotAnArray { found: "an object" }));

        let err = ingest_json("[{").unwrap_err();
        assert!(matches!(err, AnalyticsError::Payload(_)));
    }

    #[test]
    fn empty_payload_yields_no_records() {
        let (records, report) = ingest_json("[]").unwrap();
        assert!(records.is_empty());
        assert_eq!(report, IngestReport::default());
    }
}
