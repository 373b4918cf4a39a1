// src/cli.rs
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use color_eyre::eyre;

use crate::config::consts::*;
use crate::config::{Facility, FetchOptions, ReportMeta, RunOptions};
use crate::core::HttpTransport;
use crate::error::Error;
use crate::progress::Progress;
use crate::runner::{self, RunSummary};

/// Fetch CDash nightly results for one HPC facility, write them as CSV, and render a
/// Markdown summary.
#[derive(Parser, Debug)]
#[command(name = "cdash_scrape", version, about, long_about = None)]
pub struct Cli {
    /// Output CSV file
    #[arg(long, default_value = DEFAULT_CSV)]
    pub csv: PathBuf,

    /// Output Markdown file
    #[arg(long, default_value = DEFAULT_MARKDOWN)]
    pub markdown: PathBuf,

    /// Facility profile (target sites and build-name layout)
    #[arg(long, value_enum, default_value_t = Facility::Vortex)]
    pub facility: Facility,

    /// Look back this many days, one dashboard date at a time
    #[arg(long, value_name = "N")]
    pub days: Option<u32>,

    /// Skip fetching; only regenerate the report from an existing CSV
    #[arg(long)]
    pub skip_fetch: bool,

    /// Site/build-name substring to keep (repeatable; replaces the facility's defaults)
    #[arg(long = "target", value_name = "TOKEN")]
    pub targets: Vec<String>,

    /// CDash server
    #[arg(long, env = "CDASH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// CDash project name
    #[arg(long, env = "CDASH_PROJECT", default_value = DEFAULT_PROJECT)]
    pub project: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "CDASH_TIMEOUT_SECS", default_value_t = TIMEOUT_SECS)]
    pub timeout: u64,

    /// Exit with an error instead of falling back to placeholder builds
    #[arg(long)]
    pub no_placeholders: bool,

    /// Print every build name on the dashboard, decomposed, and exit
    #[arg(long)]
    pub list_names: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn run_options(&self) -> Result<RunOptions, Error> {
        if self.timeout == 0 {
            return Err(Error::Config(s!("--timeout must be at least 1 second")));
        }
        reqwest::Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("--base-url {}: {e}", self.base_url)))?;

        let mut fetch = FetchOptions::for_facility(self.facility);
        fetch.base_url = self.base_url.clone();
        fetch.project = self.project.clone();
        fetch.timeout_secs = self.timeout;
        fetch.placeholders = !self.no_placeholders;
        if self.days.is_some() {
            fetch.lookback_days = self.days;
        }
        if !self.targets.is_empty() {
            fetch.targets = self.targets.clone();
        }

        Ok(RunOptions {
            meta: ReportMeta::from_fetch(&fetch),
            fetch,
            csv: self.csv.clone(),
            markdown: self.markdown.clone(),
            skip_fetch: self.skip_fetch,
        })
    }
}

/// Prints progress lines to stdout.
struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        if total > 1 {
            println!("Fetching {total} dashboard dates…");
        }
    }
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
    fn period_done(&mut self, label: &str, count: usize) {
        println!("  {label}: {count} builds");
    }
}

fn print_names(opts: &RunOptions) -> eyre::Result<()> {
    let transport = HttpTransport::new(opts.fetch.timeout_secs)?;
    let names = runner::list_build_names(&transport, &opts.fetch);
    let fields = opts.fetch.layout.fields();

    let mut out = std::io::stdout().lock();
    let titles: Vec<&str> = fields.iter().map(|f| f.name()).collect();
    writeln!(out, "| build name | {} |", titles.join(" | "))?;
    let rule: Vec<String> = titles.iter().map(|t| "-".repeat(t.len() + 2)).collect();
    writeln!(out, "|------------|{}|", rule.join("|"))?;
    for (name, parts) in &names {
        let cells: Vec<&str> = fields.iter().map(|f| parts.get(*f)).collect();
        writeln!(out, "| {name} | {} |", cells.join(" | "))?;
    }
    if names.is_empty() {
        tracing::warn!("dashboard returned no build names");
    }
    Ok(())
}

pub fn run() -> eyre::Result<ExitCode> {
    let cli = Cli::parse();
    crate::log::init(cli.verbose);
    let opts = cli.run_options()?;

    if cli.list_names {
        print_names(&opts)?;
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = runner::run(&opts, Some(&mut ConsoleProgress));
    exit_status(&opts, outcome)
}

/// Print the outcome of a run and map it to the process exit code.
///
/// `NoRecords` prints the likely causes and exits 1; other errors propagate.
pub fn exit_status(opts: &RunOptions, outcome: Result<RunSummary, Error>) -> eyre::Result<ExitCode> {
    let label = opts.fetch.facility.label();
    let summary = match outcome {
        Ok(summary) => summary,
        Err(Error::NoRecords { targets }) => {
            eprintln!("No {label} builds found (targets: {}). This might be due to:", targets.join(", "));
            eprintln!("1. No {label} builds currently available");
            eprintln!("2. Changes in CDash page structure");
            eprintln!("3. Network connectivity issues");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(eyre::Report::new(e).wrap_err("run failed")),
    };

    if summary.fetched > 0 {
        println!("Found {} builds from {label}", summary.fetched);
    }
    println!("\nCompleted successfully!");
    println!("CSV report: {}", opts.csv.display());
    match &summary.markdown {
        Some(md) => println!("Markdown report: {}", md.display()),
        None => println!("Markdown report: not written ({} not found)", opts.csv.display()),
    }
    Ok(ExitCode::SUCCESS)
}
