//! Data-table support: display rows, global search, per-column filters and
//! column sort.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{
    format::{format_clock, format_day},
    model::ViolationRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Date,
    Time,
    Site,
    ViolationType,
    RiskLevel,
    ImageReference,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Date,
        Column::Time,
        Column::Site,
        Column::ViolationType,
        Column::RiskLevel,
        Column::ImageReference,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Time => "Time",
            Column::Site => "Site Name",
            Column::ViolationType => "Violation Type",
            Column::RiskLevel => "Risk Level",
            Column::ImageReference => "Image Reference",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Display strings for one table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id: String,
    pub date: String,
    pub time: String,
    pub site: String,
    pub violation_type: String,
    pub risk_level: String,
    pub image_reference: String,
}

impl TableRow {
    pub fn cell(&self, column: Column) -> &str {
        match column {
            Column::Date => &self.date,
            Column::Time => &self.time,
            Column::Site => &self.site,
            Column::ViolationType => &self.violation_type,
            Column::RiskLevel => &self.risk_level,
            Column::ImageReference => &self.image_reference,
        }
    }

    fn contains(&self, column: Column, needle: &str) -> bool {
        self.cell(column).to_lowercase().contains(needle)
    }

    /// One CSV line (no terminator): the id followed by every column.
    pub fn to_csv_line(&self) -> String {
        let mut line = String::new();
        write_csv_field(&mut line, &self.id);
        for column in Column::ALL {
            line.push(',');
            write_csv_field(&mut line, self.cell(column));
        }
        line
    }
}

/// Quote a field containing a separator, a quote or a line break; inner
/// quotes are doubled.
fn write_csv_field(out: &mut String, field: &str) {
    if !field.contains(|ch: char| matches!(ch, ',' | '"' | '\n' | '\r')) {
        out.push_str(field);
        return;
    }
    out.push('"');
    for ch in field.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

impl From<&ViolationRecord> for TableRow {
    fn from(record: &ViolationRecord) -> Self {
        let (date, time) = match record.timestamp {
            Some(ts) => (format_day(ts.date()), format_clock(ts)),
            None => (record.raw_timestamp.clone(), String::new()),
        };

        Self {
            id: record.id.to_string(),
            date,
            time,
            site: record.site.clone().unwrap_or_default(),
            violation_type: record.violation_type.clone(),
            risk_level: record.risk.display().to_string(),
            image_reference: record.image_reference.clone().unwrap_or_default(),
        }
    }
}

/// Keep records where any visible column contains `query`, ignoring case.
/// A blank query keeps everything. Input order is preserved.
pub fn search<'a, I>(records: I, query: &str) -> Vec<&'a ViolationRecord>
where
    I: IntoIterator<Item = &'a ViolationRecord>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.into_iter().collect();
    }

    records
        .into_iter()
        .filter(|record| {
            let row = TableRow::from(*record);
            Column::ALL.into_iter().any(|column| row.contains(column, &needle))
        })
        .collect()
}

/// Keep records where every `(column, text)` pair matches as a
/// case-insensitive substring. Blank texts are ignored; an empty filter list
/// keeps everything. Input order is preserved.
pub fn filter_columns<'a, I>(records: I, filters: &[(Column, &str)]) -> Vec<&'a ViolationRecord>
where
    I: IntoIterator<Item = &'a ViolationRecord>,
{
    let needles: Vec<(Column, String)> = filters
        .iter()
        .map(|(column, text)| (*column, text.trim().to_lowercase()))
        .filter(|(_, needle)| !needle.is_empty())
        .collect();
    if needles.is_empty() {
        return records.into_iter().collect();
    }

    records
        .into_iter()
        .filter(|record| {
            let row = TableRow::from(*record);
            needles.iter().all(|(column, needle)| row.contains(*column, needle))
        })
        .collect()
}

/// Stable sort of a record view by one column.
///
/// Date and time order by instant; records without one sort after every
/// timestamped record when ascending. Text columns compare case-insensitively.
pub fn sort_records(records: &mut [&ViolationRecord], column: Column, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = compare(a, b, column);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare(a: &ViolationRecord, b: &ViolationRecord, column: Column) -> Ordering {
    match column {
        Column::Date => compare_optional(a.timestamp, b.timestamp),
        Column::Time => compare_optional(a.timestamp.map(|ts| ts.time()), b.timestamp.map(|ts| ts.time())),
        Column::Site => compare_text(a.site().unwrap_or_default(), b.site().unwrap_or_default()),
        Column::ViolationType => compare_text(&a.violation_type, &b.violation_type),
        Column::RiskLevel => compare_text(a.risk.display(), b.risk.display()),
        Column::ImageReference => compare_text(
            a.image_reference.as_deref().unwrap_or_default(),
            b.image_reference.as_deref().unwrap_or_default(),
        ),
    }
}

fn compare_optional<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawViolation;

    fn record(id: i64, ts: &str, site: Option<&str>, kind: &str, risk: &str) -> ViolationRecord {
        RawViolation::new(id, ts, site, risk)
            .with_violation_type(kind)
            .with_image_reference(&format!("img_{id}.jpeg"))
            .normalize()
            .unwrap()
    }

    fn sample() -> Vec<ViolationRecord> {
        vec![
            record(1, "2024-01-02T09:00:00Z", Some("North Yard"), "No helmet", "High"),
            record(2, "2024-01-01T15:30:00Z", Some("south dock"), "No vest", "compliant"),
            record(3, "unknown", None, "No gloves", "Unknown"),
        ]
    }

    fn ids(view: &[&ViolationRecord]) -> Vec<String> {
        view.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn row_renders_display_columns() {
        let records = sample();
        let row = TableRow::from(&records[0]);
        assert_eq!(row.date, "2024-01-02");
        assert_eq!(row.time, "09:00:00");
        assert_eq!(row.site, "North Yard");
        assert_eq!(row.risk_level, "high");
        assert_eq!(row.image_reference, "img_1.jpeg");

        let unparsed = TableRow::from(&records[2]);
        assert_eq!(unparsed.date, "unknown");
        assert_eq!(unparsed.time, "");
        assert_eq!(unparsed.site, "");
        assert_eq!(unparsed.risk_level, "Unknown");
    }

    #[test]
    fn search_is_case_insensitive_across_columns() {
        let records = sample();
        assert_eq!(ids(&search(&records, "YARD")), ["1"]);
        assert_eq!(ids(&search(&records, "no ")), ["1", "2", "3"]);
        assert_eq!(ids(&search(&records, "15:30")), ["2"]);
        assert_eq!(ids(&search(&records, "unknown")), ["3"]);
        assert!(search(&records, "crane").is_empty());
    }

    #[test]
    fn search_matches_image_reference() {
        let records = vec![RawViolation::new(4, "2024-01-03T07:00:00Z", Some("Gate"), "medium")
            .with_image_reference("cam7_0042.jpeg")
            .normalize()
            .unwrap()];
        assert_eq!(ids(&search(&records, "CAM7")), ["4"]);

        let records = sample();
        assert_eq!(ids(&search(&records, "img_2")), ["2"]);
    }

    #[test]
    fn column_filters_combine_with_and() {
        let records = sample();
        assert_eq!(ids(&filter_columns(&records, &[(Column::ViolationType, "NO ")])), ["1", "2", "3"]);
        assert_eq!(
            ids(&filter_columns(
                &records,
                &[(Column::ViolationType, "no"), (Column::Site, "yard")]
            )),
            ["1"]
        );
        assert!(filter_columns(&records, &[(Column::Site, "yard"), (Column::RiskLevel, "compliant")]).is_empty());
        // "15:30" is in the Time column only.
        assert!(filter_columns(&records, &[(Column::Date, "15:30")]).is_empty());
    }

    #[test]
    fn blank_column_filters_are_ignored() {
        let records = sample();
        assert_eq!(ids(&filter_columns(&records, &[])), ["1", "2", "3"]);
        assert_eq!(ids(&filter_columns(&records, &[(Column::Site, "  ")])), ["1", "2", "3"]);
    }

    #[test]
    fn column_filters_narrow_a_search() {
        let records = sample();
        let searched = search(&records, "no");
        let narrowed = filter_columns(searched, &[(Column::ImageReference, "img_2")]);
        assert_eq!(ids(&narrowed), ["2"]);
    }

    #[test]
    fn csv_line_quotes_only_when_needed() {
        let row = TableRow::from(
            &RawViolation::new(5, "2024-01-01T10:00:00Z", Some("Dock, East"), "high")
                .with_violation_type("say \"hi\"")
                .normalize()
                .unwrap(),
        );
        assert_eq!(
            row.to_csv_line(),
            "5,2024-01-01,10:00:00,\"Dock, East\",\"say \"\"hi\"\"\",high,"
        );
    }

    #[test]
    fn blank_search_keeps_everything() {
        let records = sample();
        assert_eq!(ids(&search(&records, "   ")), ["1", "2", "3"]);
    }

    #[test]
    fn sort_by_date_puts_unparsed_last() {
        let records = sample();
        let mut view: Vec<&ViolationRecord> = records.iter().collect();
        sort_records(&mut view, Column::Date, SortDirection::Ascending);
        assert_eq!(ids(&view), ["2", "1", "3"]);
        sort_records(&mut view, Column::Date, SortDirection::Descending);
        assert_eq!(ids(&view), ["3", "1", "2"]);
    }

    #[test]
    fn sort_by_site_ignores_case() {
        let records = sample();
        let mut view: Vec<&ViolationRecord> = records.iter().collect();
        sort_records(&mut view, Column::Site, SortDirection::Ascending);
        assert_eq!(ids(&view), ["3", "1", "2"]);
    }
}
