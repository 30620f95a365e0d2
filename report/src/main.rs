use std::{
    io::{self, Read},
    path::Path,
};

use analytics::{ingest_json, table, Dashboard, DashboardConfig};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod args;
mod render;

use args::{Args, OutputFormat};

fn main() -> Result<()> {
    init_tracing();
    run(Args::parse())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => DashboardConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    let payload = read_input(&args.input)?;
    let (records, ingest) = ingest_json(&payload).context("decoding violation records")?;
    info!(
        accepted = ingest.accepted,
        skipped = ingest.skipped,
        unparsed_timestamps = ingest.unparsed_timestamps,
        unrecognized_risk = ingest.unrecognized_risk,
        "records loaded"
    );
    if ingest.skipped > 0 {
        warn!(skipped = ingest.skipped, "some records could not be decoded");
    }

    let criteria = args.criteria(&config.filter).context("building filter criteria")?;
    let dashboard = Dashboard::new(config.scoring)
        .with_records(records)
        .with_criteria(criteria);

    let mut rows = dashboard.filtered();
    if let Some(query) = args.search.as_deref() {
        rows = table::search(rows, query);
    }
    rows = table::filter_columns(rows, &args.column_filters());
    if let Some((column, direction)) = args.sort() {
        table::sort_records(&mut rows, column, direction);
    }

    let output = match args.format {
        OutputFormat::Json => render::json(ingest, dashboard.options(), dashboard.snapshot(), &rows)
            .context("serializing report")?,
        OutputFormat::Csv => render::csv(&rows),
        OutputFormat::Text => render::text(dashboard.snapshot(), &rows).join("\n"),
    };

    println!("{}", output.trim_end());
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut payload = String::new();
        io::stdin()
            .read_to_string(&mut payload)
            .context("reading records from stdin")?;
        return Ok(payload);
    }

    std::fs::read_to_string(path).with_context(|| format!("reading records from {}", path.display()))
}
