//! Command-line arguments and how they combine with a configured filter preset.

use std::path::PathBuf;

use analytics::{
    config::FilterPreset,
    model::{timestamp::parse_day, RiskLevel},
    table::{Column, SortDirection},
    FilterCriteria,
};
use clap::{Parser, ValueEnum};
use time::Date;

/// Summarize PPE violation records: filters, risk counts, site scores and trends.
#[derive(Parser, Debug, Clone)]
#[command(name = "ppe-report", version)]
pub struct Args {
    /// Violation payload (a JSON array); `-` reads stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: PathBuf,

    /// Dashboard configuration (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long, value_parser = day_arg)]
    pub from: Option<Date>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long, value_parser = day_arg)]
    pub to: Option<Date>,

    /// Restrict to a site; repeat for several
    #[arg(long = "site", value_name = "SITE")]
    pub sites: Vec<String>,

    /// Restrict to one risk level (compliant, medium, high)
    #[arg(long)]
    pub risk: Option<RiskLevel>,

    /// Table search across all columns
    #[arg(long)]
    pub search: Option<String>,

    /// Table column filter as COLUMN=TEXT (case-insensitive contains); repeat to combine
    #[arg(long = "column-filter", value_name = "COLUMN=TEXT", value_parser = column_filter_arg)]
    pub column_filters: Vec<ColumnFilter>,

    /// Table sort column
    #[arg(long, value_enum)]
    pub sort: Option<TableColumn>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    pub descending: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableColumn {
    Date,
    Time,
    Site,
    Type,
    Risk,
    Image,
}

impl From<TableColumn> for Column {
    fn from(column: TableColumn) -> Self {
        match column {
            TableColumn::Date => Column::Date,
            TableColumn::Time => Column::Time,
            TableColumn::Site => Column::Site,
            TableColumn::Type => Column::ViolationType,
            TableColumn::Risk => Column::RiskLevel,
            TableColumn::Image => Column::ImageReference,
        }
    }
}

/// One `--column-filter` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub column: Column,
    pub text: String,
}

impl Args {
    /// Preset criteria with any flag given on the command line taking precedence.
    pub fn criteria(&self, preset: &FilterPreset) -> analytics::Result<FilterCriteria> {
        let mut criteria = preset.to_criteria()?;

        if self.from.is_some() || self.to.is_some() {
            let bounds = FilterCriteria::between_days(self.from, self.to);
            if self.from.is_some() {
                criteria.from = bounds.from;
            }
            if self.to.is_some() {
                criteria.to = bounds.to;
            }
        }
        if !self.sites.is_empty() {
            criteria.sites = FilterCriteria::new().with_sites(self.sites.iter().cloned()).sites;
        }
        if self.risk.is_some() {
            criteria.risk_level = self.risk;
        }

        Ok(criteria)
    }

    pub fn column_filters(&self) -> Vec<(Column, &str)> {
        self.column_filters
            .iter()
            .map(|filter| (filter.column, filter.text.as_str()))
            .collect()
    }

    pub fn sort(&self) -> Option<(Column, SortDirection)> {
        let direction = if self.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.sort.map(|column| (column.into(), direction))
    }
}

fn day_arg(raw: &str) -> Result<Date, String> {
    parse_day(raw).ok_or_else(|| format!("`{raw}` is not a YYYY-MM-DD date"))
}

fn column_filter_arg(raw: &str) -> Result<ColumnFilter, String> {
    let (name, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("`{raw}` is not COLUMN=TEXT"))?;
    let column = TableColumn::from_str(name.trim(), true)?;
    Ok(ColumnFilter {
        column: column.into(),
        text: text.to_string(),
    })
}
