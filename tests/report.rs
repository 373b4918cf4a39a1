// tests/report.rs
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;

use cdash_scrape::config::{Facility, FetchOptions, ReportMeta};
use cdash_scrape::decompose::NameLayout;
use cdash_scrape::record::{BuildRecord, Counts, RawBuild};
use cdash_scrape::report::{render_markdown, Summary};

fn at(h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 24, h, 30, 0).unwrap()
}

fn meta(facility: Facility) -> ReportMeta {
    ReportMeta::from_fetch(&FetchOptions::for_facility(facility))
}

fn record(layout: NameLayout, site: &str, name: &str, counts: Counts, date: Option<&str>) -> BuildRecord {
    let raw = RawBuild {
        site: site.into(),
        build_name: name.into(),
        build_stamp: "20240924-0000-Nightly".into(),
        counts,
    };
    BuildRecord::new(raw, layout, "2024-09-24T12:00:00Z", date)
}

fn tests(passed: u64, failed: u64) -> Counts {
    Counts { test_passed: passed, test_failed: failed, ..Counts::default() }
}

fn vortex(site: &str, name: &str, counts: Counts) -> BuildRecord {
    record(NameLayout::Positional4, site, name, counts, None)
}

#[test]
fn single_clean_build() {
    let recs = vec![vortex("vortex.llnl.gov", "1.14.4/openmpi-4.1/gcc-13.2/linux", tests(3200, 0))];
    let md = render_markdown(&recs, &meta(Facility::Vortex), at(12));

    assert!(md.starts_with("# HDF5 Vortex Test Results Report\n\nGenerated on: 2024-09-24 12:30:00 UTC\n"));
    for line in [
        "- **Total Vortex Builds**: 1",
        "- **Unique Sites**: 1",
        "- **Total Tests**: 3,200",
        "- **Tests Passed**: 3,200",
        "- **Tests Failed**: 0",
        "- **Pass Rate**: 100.00%",
        "| Site | Version | OS | MPI | Compiler | Configure | Build | Tests | Pass Rate |",
        "|----|-------|--|---|--------|---------|-----|-----|---------|",
        "| vortex.llnl.gov | 1.14.4 | linux | openmpi-4.1 | gcc-13.2 | ✅ | ✅ | 3200/3200 | 100.0% |",
        "1. **gcc-13.2** (1.14.4, openmpi-4.1): 100.00% (3200 tests)",
        "*Report generated by cdash_scrape on 2024-09-24 12:30:00 UTC*",
    ] {
        assert!(md.lines().any(|l| l == line), "missing line {line:?} in\n{md}");
    }
    assert!(!md.contains("Dates Covered"));
}

#[test]
fn empty_input_renders_zeros_and_no_rows() {
    let md = render_markdown(&[], &meta(Facility::Vortex), at(12));

    assert!(md.contains("- **Total Vortex Builds**: 0\n"));
    assert!(md.contains("- **Unique Sites**: 0\n"));
    assert!(md.contains("- **Pass Rate**: 0.00%\n"));
    assert!(md.contains("|---------|\n\n## Detailed Statistics"));
    assert!(md.contains("### Compiler Performance\n\n---\n"));
}

#[test]
fn section_order_is_fixed() {
    let recs = vec![vortex("vortex.llnl.gov", "1.14.4/openmpi/gcc/linux", tests(10, 0))];
    let md = render_markdown(&recs, &meta(Facility::Vortex), at(1));

    let order = [
        "# HDF5 Vortex",
        "## Summary",
        "## Build Results",
        "## Detailed Statistics",
        "### Build Issues",
        "### Test Statistics",
        "### Compiler Performance",
        "*Report generated by",
    ];
    let positions: Vec<usize> = order.iter().map(|h| md.find(h).unwrap()).collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
}

#[test]
fn issues_show_error_counts_and_totals() {
    let counts = Counts {
        configure_warnings: 4,
        configure_errors: 2,
        build_warnings: 9,
        build_errors: 0,
        test_not_run: 3,
        test_passed: 98,
        test_failed: 2,
        ..Counts::default()
    };
    let recs = vec![vortex("vortex.llnl.gov", "1.14.4/mpich/clang/toss", counts)];
    let md = render_markdown(&recs, &meta(Facility::Vortex), at(8));

    assert!(md.contains("| vortex.llnl.gov | 1.14.4 | toss | mpich | clang | ❌(2) | ✅ | 98/100 | 98.0% |\n"));
    assert!(md.contains("- **Total Configure Warnings**: 4\n"));
    assert!(md.contains("- **Total Configure Errors**: 2\n"));
    assert!(md.contains("- **Total Build Warnings**: 9\n"));
    assert!(md.contains("- **Total Build Errors**: 0\n"));
    assert!(md.contains("- **Tests Not Run**: 3\n"));
    assert!(md.contains("- **Pass Rate**: 98.00%\n"));
}

#[test]
fn long_cells_are_truncated() {
    let recs = vec![vortex(
        "averyveryverylongsite.example.org",
        "1.14.4-really-long-version/openmpi/gcc/linux",
        tests(1, 0),
    )];
    let md = render_markdown(&recs, &meta(Facility::Vortex), at(12));
    assert!(md.contains("| averyveryverylo... | 1.14.4-really-l... | linux |"));
}

#[test]
fn frontier_table_has_arch_first() {
    let recs = vec![record(
        NameLayout::Positional5,
        "frontier.olcf.ornl.gov",
        "x86_64/suse-es-15-sp6/cmpich-8.1.31/cce-18.0.1/2.0.0-2",
        tests(3148, 2),
        Some("2024-09-24"),
    )];
    let md = render_markdown(&recs, &meta(Facility::Frontier), at(12));

    assert!(md.contains("# HDF5 Frontier Test Results Report\n"));
    assert!(md.contains("- **Total Frontier Builds**: 1\n"));
    assert!(md.contains(
        "| Site | Arch | OS | MPI | Compiler | Version | Configure | Build | Tests | Pass Rate |\n"
    ));
    assert!(md.contains("| frontier.olcf.o... | x86_64 | suse-es-15-sp6 | cmpich-8.1.3... | cce-18.0.1 | 2.0.0-2 |"));
    assert!(md.contains("3148/3150 | 99.9% |"));
}

#[test]
fn date_span_covers_min_and_max() {
    let layout = NameLayout::Positional5;
    let name = "x86_64/sles/cmpich/gcc/2.0.0";
    let recs = vec![
        record(layout, "frontier", name, tests(1, 0), Some("2024-09-23")),
        record(layout, "frontier", name, tests(1, 0), Some("2024-09-21")),
        record(layout, "frontier", name, tests(1, 0), Some("2024-09-24")),
    ];

    let s = Summary::from_records(&recs);
    assert_eq!(s.date_span, Some(("2024-09-21".to_string(), "2024-09-24".to_string())));
    assert_eq!(s.unique_sites, 1);

    let md = render_markdown(&recs, &meta(Facility::Frontier), at(12));
    assert!(md.contains("- **Dates Covered**: 2024-09-21 to 2024-09-24\n"));
}

#[test]
fn ranking_is_stable_and_skips_builds_without_tests() {
    let recs = vec![
        vortex("a", "1/mpi/first/os", tests(90, 10)),
        vortex("b", "1/mpi/idle/os", tests(0, 0)),
        vortex("c", "1/mpi/best/os", tests(50, 0)),
        vortex("d", "1/mpi/second/os", tests(9, 1)),
    ];
    let s = Summary::from_records(&recs);

    let order: Vec<&str> = s.ranking.iter().map(|c| c.compiler.as_str()).collect();
    assert_eq!(order, vec!["best", "first", "second"]);
    assert_eq!(s.ranking[1].total_tests, 100);
    assert_eq!(s.total_builds, 4);
    assert_eq!(s.total_tests, 160);
    assert_eq!(s.passed, 149);
}

#[test]
fn only_top_five_compilers_are_listed() {
    let recs: Vec<BuildRecord> = (0..7u64)
        .map(|i| vortex("vortex", &format!("1/mpi/cc{i}/os"), tests(100 - i, i)))
        .collect();
    let md = render_markdown(&recs, &meta(Facility::Vortex), at(12));

    assert!(md.contains("1. **cc0** (1, mpi): 100.00% (100 tests)\n"));
    assert!(md.contains("5. **cc4** (1, mpi): 96.00% (100 tests)\n"));
    assert!(!md.contains("**cc5**"));
    assert!(!md.contains("6. "));
}

#[test]
fn same_records_and_time_render_identically() {
    let recs = vec![
        vortex("vortex.llnl.gov", "1.14.4/openmpi/gcc/linux", tests(10, 1)),
        vortex("vortex2.llnl.gov", "1.14.4/mpich/clang/linux", tests(20, 0)),
    ];
    let m = meta(Facility::Vortex);
    assert_eq!(render_markdown(&recs, &m, at(3)), render_markdown(&recs, &m, at(3)));

    let strip = |md: String| -> Vec<String> {
        md.lines().filter(|l| !l.contains("2024-09-24 ")).map(String::from).collect()
    };
    assert_eq!(strip(render_markdown(&recs, &m, at(3))), strip(render_markdown(&recs, &m, at(9))));
}

#[test]
fn table_follows_the_records_layout() {
    let recs = vec![record(
        NameLayout::Positional5,
        "frontier",
        "x86_64/sles/cmpich/cce/2.0.0",
        tests(5, 0),
        None,
    )];
    let md = render_markdown(&recs, &meta(Facility::Vortex), at(12));

    assert!(md.contains("| Site | Arch | OS | MPI | Compiler | Version | Configure |"));
    assert!(md.contains("| frontier | x86_64 | sles | cmpich | cce | 2.0.0 | ✅ | ✅ | 5/5 | 100.0% |\n"));
}

#[test]
fn huge_counts_saturate() {
    let recs = cdash_scrape::csv::read_records(
        "site,test_passed,test_failed,compiler\nvortex,18446744073709551615,1,gcc\nvortex,5,0,gcc\n",
    );
    assert_eq!(recs[0].tests_total(), u64::MAX);
    assert!(recs[0].pass_rate() > 99.9 && recs[0].pass_rate() <= 100.0);

    let s = Summary::from_records(&recs);
    assert_eq!(s.passed, u64::MAX);
    assert_eq!(s.failed, 1);
    assert_eq!(s.total_tests, u64::MAX);
    assert!(s.pass_rate <= 100.0);

    let md = render_markdown(&recs, &meta(Facility::Vortex), at(12));
    assert!(md.contains("- **Tests Passed**: 18,446,744,073,709,551,615\n"));
}
