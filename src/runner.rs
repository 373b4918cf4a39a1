// src/runner.rs
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};

use crate::{
    config::{FetchOptions, ReportMeta, RunOptions},
    core::{HttpTransport, Transport},
    decompose::{self, NameFields},
    error::{Error, Result},
    file::write_text,
    progress::Progress,
    report::{render_markdown, table_layout},
    scrape::{lookback_dates, Collector},
    store::{load_records, save_records},
};

/// Summary of what was produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Records fetched this run; 0 when fetching was skipped.
    pub fetched: usize,
    pub csv: Option<PathBuf>,
    pub markdown: Option<PathBuf>,
}

/// Top-level runner over real HTTP.
pub fn run(opts: &RunOptions, progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    let transport = HttpTransport::new(opts.fetch.timeout_secs)?;
    run_with(&transport, opts, progress)
}

/// Fetch (unless skipped) → save CSV → render report from that CSV.
pub fn run_with<T: Transport>(
    transport: T,
    opts: &RunOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    if !opts.skip_fetch {
        let dates = lookback_dates(Local::now().date_naive(), opts.fetch.lookback_days);
        let records = Collector::new(transport, &opts.fetch).collect(&dates, progress);
        tracing::info!(builds = records.len(), facility = opts.fetch.facility.label(), "fetch finished");

        if records.is_empty() {
            return Err(Error::NoRecords { targets: opts.fetch.targets.clone() });
        }
        summary.fetched = records.len();
        summary.csv = save_records(&opts.csv, &records)?;
    }

    summary.markdown = generate_report(&opts.csv, &opts.markdown, &opts.meta)?;
    Ok(summary)
}

/// Render `md_path` from the CSV at `csv_path`.
/// A missing CSV is not an error: it is logged and nothing is written.
pub fn generate_report(csv_path: &Path, md_path: &Path, meta: &ReportMeta) -> Result<Option<PathBuf>> {
    let Some(records) = load_records(csv_path)? else {
        tracing::error!(path = %csv_path.display(), "CSV file not found");
        return Ok(None);
    };
    if records.is_empty() {
        tracing::warn!(path = %csv_path.display(), "no data found in CSV file");
    }
    let layout = table_layout(&records, meta);
    if layout != meta.layout {
        tracing::warn!(
            path = %csv_path.display(),
            csv = ?layout,
            facility = %meta.label,
            "CSV name columns do not match the facility layout; using the CSV's"
        );
    }

    let report = render_markdown(&records, meta, Utc::now());
    write_text(md_path, &report)?;
    tracing::info!(path = %md_path.display(), "Markdown report generated");
    Ok(Some(md_path.to_path_buf()))
}

/// Every distinct build name on the unfiltered dashboard, decomposed with the
/// facility's layout. Useful for eyeballing how new naming schemes split.
pub fn list_build_names<T: Transport>(transport: T, fetch: &FetchOptions) -> Vec<(String, NameFields)> {
    Collector::new(transport, fetch)
        .build_names()
        .into_iter()
        .map(|name| {
            let fields = decompose::decompose(fetch.layout, &name);
            (name, fields)
        })
        .collect()
}
