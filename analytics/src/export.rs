//! CSV and JSON export of the filtered view.

use crate::{
    dashboard::DashboardSnapshot,
    error::Result,
    model::ViolationRecord,
    table::{Column, TableRow},
};

/// Header line plus one line per record, in the order given.
pub fn to_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a ViolationRecord>,
{
    let mut csv = std::iter::once("ID")
        .chain(Column::ALL.iter().map(Column::header))
        .collect::<Vec<_>>()
        .join(",");
    csv.push('\n');

    for record in records {
        csv.push_str(&TableRow::from(record).to_csv_line());
        csv.push('\n');
    }

    csv
}

pub fn snapshot_json(snapshot: &DashboardSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}
