//! Output renderers for the report command.

use analytics::{
    export::to_csv,
    filter::FilterOptions,
    format::{format_score, format_share},
    model::{IngestReport, ViolationRecord},
    table::TableRow,
    DashboardSnapshot, RiskLevel,
};
use serde::Serialize;

/// Everything the JSON output carries, in one document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport<'a> {
    pub ingest: IngestReport,
    pub options: FilterOptions,
    pub snapshot: &'a DashboardSnapshot,
    pub rows: Vec<TableRow>,
}

pub fn json(
    ingest: IngestReport,
    options: FilterOptions,
    snapshot: &DashboardSnapshot,
    rows: &[&ViolationRecord],
) -> serde_json::Result<String> {
    let report = JsonReport {
        ingest,
        options,
        snapshot,
        rows: rows.iter().map(|record| TableRow::from(*record)).collect(),
    };
    serde_json::to_string_pretty(&report)
}

pub fn csv(rows: &[&ViolationRecord]) -> String {
    to_csv(rows.iter().copied())
}

/// Plain-text summary, one fact per line.
pub fn text(snapshot: &DashboardSnapshot, rows: &[&ViolationRecord]) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("PPE compliance report".to_string());
    lines.push(format!(
        "{} of {} records match the current filters",
        snapshot.matched_records, snapshot.total_records
    ));

    if snapshot.is_empty() {
        lines.push("No data available for the selected filters.".to_string());
        return lines;
    }

    lines.push(String::new());
    lines.push("Violations by category".to_string());
    for (level, count) in snapshot.risk_counts.iter() {
        let share = snapshot.risk_distribution.share(level);
        lines.push(format!("  {:<12} {count:>6}  {}", level.label(), format_share(share)));
    }

    lines.push(String::new());
    lines.push("Site compliance scores".to_string());
    for entry in &snapshot.site_scores {
        lines.push(format!("  {:<24} {}", entry.site, format_score(entry.score)));
    }

    lines.push(String::new());
    lines.push("High-risk areas".to_string());
    for profile in &snapshot.site_risk {
        lines.push(format!(
            "  {:<24} high {:>4}  risk {:>5.1}",
            profile.site,
            profile.breakdown.get(RiskLevel::High),
            profile.risk_score
        ));
    }

    lines.push(String::new());
    lines.push("Daily trend".to_string());
    for point in &snapshot.trend {
        lines.push(format!("  {}  {}", point.label(), point.count));
    }

    lines.push(String::new());
    lines.push("Time of day".to_string());
    for slot in &snapshot.time_of_day {
        lines.push(format!("  {:<26} {}", slot.slot.label(), slot.total));
    }

    lines.push(String::new());
    lines.push(format!("{} table rows", rows.len()));
    for record in rows.iter().take(20) {
        let row = TableRow::from(*record);
        lines.push(format!(
            "  {} {} · {} · {} · {}",
            row.date, row.time, row.site, row.violation_type, row.risk_level
        ));
    }
    if rows.len() > 20 {
        lines.push(format!("  … {} more", rows.len() - 20));
    }

    lines
}
