// src/report.rs
//! Aggregation and Markdown rendering.
//!
//! Everything here is a pure function of the record slice (plus the timestamp passed
//! in), so rendering the same CSV twice with the same `generated_at` gives identical
//! bytes.

use std::collections::HashSet;
use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::config::consts::*;
use crate::config::ReportMeta;
use crate::core::sanitize::{thousands, truncate};
use crate::decompose::{Field, NameLayout};
use crate::record::{pass_rate, BuildRecord};

/// One ranked entry of the compiler table (one per record that ran tests).
#[derive(Clone, Debug, PartialEq)]
pub struct CompilerStat {
    pub compiler: String,
    pub version: String,
    pub mpi: String,
    pub pass_rate: f64,
    pub total_tests: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    pub total_builds: usize,
    pub unique_sites: usize,
    pub total_tests: u64,
    pub passed: u64,
    pub failed: u64,
    pub not_run: u64,
    pub pass_rate: f64,
    pub configure_warnings: u64,
    pub configure_errors: u64,
    pub build_warnings: u64,
    pub build_errors: u64,
    /// Earliest and latest `date` seen, when records carry dates.
    pub date_span: Option<(String, String)>,
    /// Sorted by pass rate, descending; ties keep record order.
    pub ranking: Vec<CompilerStat>,
}

impl Summary {
    pub fn from_records(records: &[BuildRecord]) -> Self {
        let mut s = Summary {
            total_builds: records.len(),
            unique_sites: records.iter().map(|r| r.site.as_str()).collect::<HashSet<_>>().len(),
            ..Summary::default()
        };

        for r in records {
            let c = &r.counts;
            // cells are unvalidated, so sums saturate
            s.passed = s.passed.saturating_add(c.test_passed);
            s.failed = s.failed.saturating_add(c.test_failed);
            s.not_run = s.not_run.saturating_add(c.test_not_run);
            s.configure_warnings = s.configure_warnings.saturating_add(c.configure_warnings);
            s.configure_errors = s.configure_errors.saturating_add(c.configure_errors);
            s.build_warnings = s.build_warnings.saturating_add(c.build_warnings);
            s.build_errors = s.build_errors.saturating_add(c.build_errors);
        }
        s.total_tests = s.passed.saturating_add(s.failed);
        s.pass_rate = pass_rate(s.passed, s.failed);

        let mut dates = records.iter().filter_map(|r| r.date.as_deref());
        if let Some(first) = dates.next() {
            let (lo, hi) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
            s.date_span = Some((s!(lo), s!(hi)));
        }

        s.ranking = records
            .iter()
            .filter(|r| r.tests_total() > 0)
            .map(|r| CompilerStat {
                compiler: r.name.compiler.clone(),
                version: r.name.version.clone(),
                mpi: r.name.mpi.clone(),
                pass_rate: r.pass_rate(),
                total_tests: r.tests_total(),
            })
            .collect();
        // stable: equal rates stay in record order
        s.ranking.sort_by(|a, b| b.pass_rate.total_cmp(&a.pass_rate));

        s
    }
}

fn status(errors: u64) -> String {
    if errors == 0 { s!("✅") } else { format!("❌({errors})") }
}

/// Leading name columns of the results table, with their truncation budgets.
fn name_columns(layout: NameLayout) -> &'static [(&'static str, Field, usize)] {
    match layout {
        NameLayout::Positional4 => &[
            ("Version", Field::Version, TRUNC_VERSION),
            ("OS", Field::Os, TRUNC_OS),
            ("MPI", Field::Mpi, TRUNC_MPI),
            ("Compiler", Field::Compiler, TRUNC_COMPILER),
        ],
        NameLayout::Positional5 => &[
            ("Arch", Field::Arch, TRUNC_ARCH),
            ("OS", Field::Os, TRUNC_OS),
            ("MPI", Field::Mpi, TRUNC_MPI),
            ("Compiler", Field::Compiler, TRUNC_COMPILER),
            ("Version", Field::Version, TRUNC_VERSION),
        ],
    }
}

fn table_header(layout: NameLayout) -> String {
    let mut titles = vec!["Site"];
    titles.extend(name_columns(layout).iter().map(|(t, _, _)| *t));
    titles.extend(["Configure", "Build", "Tests", "Pass Rate"]);

    let head = titles.join(" | ");
    let rule = titles
        .iter()
        .map(|t| "-".repeat(t.chars().count().max(2)))
        .collect::<Vec<_>>()
        .join("|");
    format!("| {head} |\n|{rule}|\n")
}

fn table_row(r: &BuildRecord, layout: NameLayout) -> String {
    let mut cells = vec![truncate(&r.site, TRUNC_SITE)];
    cells.extend(
        name_columns(layout)
            .iter()
            .map(|(_, field, budget)| truncate(r.name.get(*field), *budget)),
    );
    cells.push(status(r.counts.configure_errors));
    cells.push(status(r.counts.build_errors));
    cells.push(format!("{}/{}", r.counts.test_passed, r.tests_total()));
    cells.push(format!("{:.1}%", r.pass_rate()));
    format!("| {} |\n", cells.join(" | "))
}

/// Name layout for the results table: the records' own, else `meta`'s.
pub fn table_layout(records: &[BuildRecord], meta: &ReportMeta) -> NameLayout {
    records.first().map_or(meta.layout, |r| r.layout)
}

/// Full Markdown report.
///
/// Sections, in order: title, summary, per-build table, detailed statistics,
/// top compilers, footer. An empty `records` renders zeros and an empty table.
/// Table columns follow the layout the records were built or loaded with.
pub fn render_markdown(records: &[BuildRecord], meta: &ReportMeta, generated_at: DateTime<Utc>) -> String {
    let stamp = generated_at.format("%Y-%m-%d %H:%M:%S UTC");
    let layout = table_layout(records, meta);
    let s = Summary::from_records(records);
    let mut out = String::new();

    // fmt::Write into a String cannot fail
    let _ = write!(
        out,
        "# {title}\n\nGenerated on: {stamp}\n\n## Summary\n\n\
         - **Total {label} Builds**: {builds}\n\
         - **Unique Sites**: {sites}\n\
         - **Total Tests**: {tests}\n\
         - **Tests Passed**: {passed}\n\
         - **Tests Failed**: {failed}\n\
         - **Pass Rate**: {rate:.2}%\n",
        title = meta.title(),
        label = meta.label,
        builds = s.total_builds,
        sites = s.unique_sites,
        tests = thousands(s.total_tests),
        passed = thousands(s.passed),
        failed = thousands(s.failed),
        rate = s.pass_rate,
    );
    if let Some((from, to)) = &s.date_span {
        let _ = writeln!(out, "- **Dates Covered**: {from} to {to}");
    }

    out.push_str("\n## Build Results\n\n");
    out.push_str(&table_header(layout));
    for r in records {
        out.push_str(&table_row(r, layout));
    }

    let _ = write!(
        out,
        "\n## Detailed Statistics\n\n### Build Issues\n\
         - **Total Configure Warnings**: {}\n\
         - **Total Configure Errors**: {}\n\
         - **Total Build Warnings**: {}\n\
         - **Total Build Errors**: {}\n\n\
         ### Test Statistics\n\
         - **Tests Not Run**: {}\n\
         - **Tests Failed**: {}\n\
         - **Tests Passed**: {}\n\n\
         ### Compiler Performance\n",
        s.configure_warnings,
        s.configure_errors,
        s.build_warnings,
        s.build_errors,
        s.not_run,
        s.failed,
        s.passed,
    );
    for (i, c) in s.ranking.iter().take(TOP_COMPILERS).enumerate() {
        let _ = writeln!(
            out,
            "{}. **{}** ({}, {}): {:.2}% ({} tests)",
            i + 1,
            c.compiler,
            c.version,
            c.mpi,
            c.pass_rate,
            c.total_tests
        );
    }

    let _ = write!(out, "\n---\n*Report generated by cdash_scrape on {stamp}*\n");
    out
}
