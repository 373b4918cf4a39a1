// src/record.rs
//! Typed build records.
//!
//! A [`RawBuild`] is what an extractor pulls out of a page or API response. Once it has
//! passed the site filter it becomes a [`BuildRecord`]: timestamped, with its build
//! name decomposed. Records are not mutated after construction.
//!
//! There is one struct for both facilities. The name layout decides which name
//! columns are persisted and in what order:
//!
//! ```text
//! timestamp, [date], site, build_name, build_stamp, update_files, configure_warnings,
//! configure_errors, build_errors, build_warnings, test_not_run, test_failed,
//! test_passed, <layout fields…>
//! ```

use crate::core::sanitize::extract_number;
use crate::decompose::{self, Field, NameFields, NameLayout};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub update_files: u64,
    pub configure_warnings: u64,
    pub configure_errors: u64,
    pub build_errors: u64,
    pub build_warnings: u64,
    pub test_not_run: u64,
    pub test_failed: u64,
    pub test_passed: u64,
}

/// One build as found on the dashboard, before filtering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawBuild {
    pub site: String,
    pub build_name: String,
    pub build_stamp: String,
    pub counts: Counts,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildRecord {
    pub timestamp: String,
    pub date: Option<String>,
    pub site: String,
    pub build_name: String,
    pub build_stamp: String,
    pub counts: Counts,
    pub layout: NameLayout,
    pub name: NameFields,
}

const COUNT_COLUMNS: [&str; 8] = [
    "update_files",
    "configure_warnings",
    "configure_errors",
    "build_errors",
    "build_warnings",
    "test_not_run",
    "test_failed",
    "test_passed",
];

impl Counts {
    fn get(&self, column: &str) -> Option<u64> {
        Some(match column {
            "update_files" => self.update_files,
            "configure_warnings" => self.configure_warnings,
            "configure_errors" => self.configure_errors,
            "build_errors" => self.build_errors,
            "build_warnings" => self.build_warnings,
            "test_not_run" => self.test_not_run,
            "test_failed" => self.test_failed,
            "test_passed" => self.test_passed,
            _ => return None,
        })
    }

    fn set(&mut self, column: &str, value: u64) {
        match column {
            "update_files" => self.update_files = value,
            "configure_warnings" => self.configure_warnings = value,
            "configure_errors" => self.configure_errors = value,
            "build_errors" => self.build_errors = value,
            "build_warnings" => self.build_warnings = value,
            "test_not_run" => self.test_not_run = value,
            "test_failed" => self.test_failed = value,
            "test_passed" => self.test_passed = value,
            _ => {}
        }
    }
}

impl BuildRecord {
    pub fn new(raw: RawBuild, layout: NameLayout, timestamp: &str, date: Option<&str>) -> Self {
        let name = decompose::decompose(layout, &raw.build_name);
        Self {
            timestamp: s!(timestamp),
            date: date.map(String::from),
            site: raw.site,
            build_name: raw.build_name,
            build_stamp: raw.build_stamp,
            counts: raw.counts,
            layout,
            name,
        }
    }

    /// Column names for this record, in CSV order.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut cols = vec!["timestamp"];
        if self.date.is_some() {
            cols.push("date");
        }
        cols.extend(["site", "build_name", "build_stamp"]);
        cols.extend(COUNT_COLUMNS);
        cols.extend(self.layout.fields().iter().map(|f| f.name()));
        cols
    }

    /// Cell text for `column`; empty for columns the record does not have.
    pub fn value(&self, column: &str) -> String {
        match column {
            "timestamp" => self.timestamp.clone(),
            "date" => self.date.clone().unwrap_or_default(),
            "site" => self.site.clone(),
            "build_name" => self.build_name.clone(),
            "build_stamp" => self.build_stamp.clone(),
            other => {
                if let Some(n) = self.counts.get(other) {
                    return n.to_string();
                }
                Field::from_name(other)
                    .map(|f| s!(self.name.get(f)))
                    .unwrap_or_default()
            }
        }
    }

    /// Rebuild a record from a CSV row laid out by `headers`.
    ///
    /// The layout is `Positional5` when the header has an `arch` column. Missing or
    /// unparseable counts read as 0 and missing name fields as `unknown`.
    pub fn from_row(headers: &[String], row: &[String]) -> Self {
        let layout = if headers.iter().any(|h| h.trim() == Field::Arch.name()) {
            NameLayout::Positional5
        } else {
            NameLayout::Positional4
        };

        let mut counts = Counts::default();
        for col in COUNT_COLUMNS {
            counts.set(col, extract_number(cell(headers, row, col)));
        }

        let mut name = NameFields::default();
        for field in layout.fields() {
            name.set(*field, cell(headers, row, field.name()));
        }

        let date = Some(cell(headers, row, "date").trim()).filter(|d| !d.is_empty()).map(String::from);

        Self {
            timestamp: s!(cell(headers, row, "timestamp")),
            date,
            site: s!(cell(headers, row, "site")),
            build_name: s!(cell(headers, row, "build_name")),
            build_stamp: s!(cell(headers, row, "build_stamp")),
            counts,
            layout,
            name,
        }
    }

    /// Passed plus failed; not-run tests do not count.
    pub fn tests_total(&self) -> u64 {
        self.counts.test_passed.saturating_add(self.counts.test_failed)
    }

    /// Percentage of passed tests, 0.0 when nothing ran.
    pub fn pass_rate(&self) -> f64 {
        pass_rate(self.counts.test_passed, self.counts.test_failed)
    }
}

fn cell<'a>(headers: &[String], row: &'a [String], name: &str) -> &'a str {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .and_then(|i| row.get(i))
        .map_or("", |s| s.as_str())
}

/// `passed / (passed + failed) * 100`, defined as 0.0 when both are zero.
pub fn pass_rate(passed: u64, failed: u64) -> f64 {
    if passed == 0 && failed == 0 {
        return 0.0;
    }
    // summed as f64, which cannot overflow
    let passed = passed as f64;
    passed / (passed + failed as f64) * 100.0
}
