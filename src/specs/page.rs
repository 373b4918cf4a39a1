// src/specs/page.rs
//! Parser for the CDash project page (`index.php?project=…`).
//!
//! Server-rendered CDash pages list builds in `<table class="tabb">` blocks, one `<tr>`
//! per build after a header row. Cells are read by position:
//!
//! | idx | field              | idx | field          |
//! |-----|--------------------|-----|----------------|
//! | 0   | site               | 6   | build errors   |
//! | 1   | build name         | 7   | build warnings |
//! | 2   | build stamp        | 8   | tests not run  |
//! | 3   | update files       | 9   | tests failed   |
//! | 4   | configure warnings | 10  | tests passed   |
//! | 5   | configure errors   |     |                |
//!
//! Only tables whose class list holds the exact `tabb` token count. Rows with fewer
//! than five cells are layout rows and get skipped. Cells past the end of a short row
//! read as 0.

use crate::core::html::{any_tag_blocks, attr_value, blocks_where, cell_text, tag_blocks, to_lower};
use crate::core::sanitize::extract_number;
use crate::record::{Counts, RawBuild};

const MIN_CELLS: usize = 5;

/// Some class in the `class` list contains `needle`.
fn class_contains(open: &str, needle: &str) -> bool {
    attr_value(open, "class")
        .is_some_and(|c| c.split_whitespace().any(|cls| to_lower(cls).contains(needle)))
}

/// The `class` list has exactly `name` (ASCII case-insensitive).
fn has_class(open: &str, name: &str) -> bool {
    attr_value(open, "class")
        .is_some_and(|c| c.split_whitespace().any(|cls| cls.eq_ignore_ascii_case(name)))
}

fn id_contains(open: &str, needle: &str) -> bool {
    attr_value(open, "id").is_some_and(|id| to_lower(&id).contains(needle))
}

fn row_to_build(cells: &[String]) -> RawBuild {
    let text = |i: usize| cells.get(i).cloned().unwrap_or_default();
    let num = |i: usize| cells.get(i).map_or(0, |c| extract_number(c));

    RawBuild {
        site: text(0),
        build_name: text(1),
        build_stamp: text(2),
        counts: Counts {
            update_files: num(3),
            configure_warnings: num(4),
            configure_errors: num(5),
            build_errors: num(6),
            build_warnings: num(7),
            test_not_run: num(8),
            test_failed: num(9),
            test_passed: num(10),
        },
    }
}

/// Builds from every `tabb` table in `html`, unfiltered, in document order.
pub fn parse_build_table(html: &str) -> Vec<RawBuild> {
    let mut builds = Vec::new();

    for table in blocks_where(html, &["table"], |open| has_class(open, "tabb")) {
        for tr in tag_blocks(table, "tr").into_iter().skip(1) {
            let cells: Vec<String> = any_tag_blocks(tr, &["td", "th"])
                .into_iter()
                .map(cell_text)
                .collect();
            if cells.len() < MIN_CELLS {
                continue;
            }
            builds.push(row_to_build(&cells));
        }
    }

    builds
}

/// `div`/`section`/`table` elements tagged HPC: by `id` first, then by class.
pub fn hpc_fragments(html: &str) -> Vec<&str> {
    const TAGS: [&str; 3] = ["div", "section", "table"];

    let by_id = blocks_where(html, &TAGS, |open| id_contains(open, "hpc"));
    if !by_id.is_empty() {
        return by_id;
    }
    blocks_where(html, &TAGS, |open| class_contains(open, "hpc"))
}
