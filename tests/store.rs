// tests/store.rs
use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use cdash_scrape::config::{Facility, FetchOptions, ReportMeta};
use cdash_scrape::csv::{parse_rows, read_records};
use cdash_scrape::decompose::NameLayout;
use cdash_scrape::record::{BuildRecord, Counts, RawBuild};
use cdash_scrape::runner::generate_report;
use cdash_scrape::store::{load_records, save_records};

fn sample(layout: NameLayout, name: &str, date: Option<&str>) -> BuildRecord {
    let raw = RawBuild {
        site: "vortex.llnl.gov".into(),
        build_name: name.into(),
        build_stamp: "20240924-0000-Nightly".into(),
        counts: Counts {
            update_files: 1,
            configure_warnings: 2,
            configure_errors: 0,
            build_errors: 3,
            build_warnings: 4,
            test_not_run: 5,
            test_failed: 6,
            test_passed: 7,
        },
    };
    BuildRecord::new(raw, layout, "2024-09-24T12:00:00Z", date)
}

#[test]
fn vortex_records_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out/hpc.csv");
    let recs = vec![
        sample(NameLayout::Positional4, "1.14.4/openmpi/gcc-13/linux", None),
        sample(NameLayout::Positional4, r#"1.14.4/mpich, "patched"/clang/toss"#, None),
    ];

    assert_eq!(save_records(&path, &recs).unwrap(), Some(path.clone()));
    assert_eq!(load_records(&path).unwrap(), Some(recs));
}

#[test]
fn header_follows_layout() {
    let dir = tempdir().unwrap();

    let vortex = dir.path().join("vortex.csv");
    save_records(&vortex, &[sample(NameLayout::Positional4, "a/b/c/d", None)]).unwrap();
    let text = fs::read_to_string(&vortex).unwrap();
    assert_eq!(
        text.lines().next().unwrap(),
        "timestamp,site,build_name,build_stamp,update_files,configure_warnings,configure_errors,\
         build_errors,build_warnings,test_not_run,test_failed,test_passed,version,mpi,compiler,os"
    );

    let frontier = dir.path().join("frontier.csv");
    let rec = sample(NameLayout::Positional5, "x86_64/sles/cmpich/cce/2.0.0", Some("2024-09-24"));
    save_records(&frontier, &[rec.clone()]).unwrap();
    let text = fs::read_to_string(&frontier).unwrap();
    let rows = parse_rows(&text);
    assert_eq!(
        rows[0],
        vec![
            "timestamp", "date", "site", "build_name", "build_stamp", "update_files",
            "configure_warnings", "configure_errors", "build_errors", "build_warnings",
            "test_not_run", "test_failed", "test_passed", "arch", "os", "mpi", "compiler", "version",
        ]
    );
    assert_eq!(load_records(&frontier).unwrap(), Some(vec![rec]));
}

#[test]
fn empty_save_writes_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    assert_eq!(save_records(&path, &[]).unwrap(), None);
    assert!(!path.exists());
}

#[test]
fn missing_csv_loads_as_none() {
    let dir = tempdir().unwrap();
    assert_eq!(load_records(&dir.path().join("nope.csv")).unwrap(), None);
}

#[test]
fn partial_rows_read_with_defaults() {
    let text = "\u{feff}site,test_passed,test_failed,compiler\r\n\
                vortex.llnl.gov,12,oops,gcc\r\n\
                \r\n\
                short\r\n";
    let recs = read_records(text);
    assert_eq!(recs.len(), 2);

    let r = &recs[0];
    assert_eq!(r.layout, NameLayout::Positional4);
    assert_eq!(r.site, "vortex.llnl.gov");
    assert_eq!(r.timestamp, "");
    assert_eq!(r.date, None);
    assert_eq!(r.counts.test_passed, 12);
    assert_eq!(r.counts.test_failed, 0);
    assert_eq!(r.name.compiler, "gcc");
    assert_eq!(r.name.version, "unknown");
    assert_eq!(r.name.arch, "unknown");

    assert_eq!(recs[1].site, "short");
    assert_eq!(recs[1].counts, Counts::default());
}

#[test]
fn arch_column_selects_five_field_layout() {
    let text = "timestamp,date,site,build_name,arch,version\n\
                t,2024-09-20,frontier,x,x86_64,2.0.0\n";
    let recs = read_records(text);
    assert_eq!(recs[0].layout, NameLayout::Positional5);
    assert_eq!(recs[0].date.as_deref(), Some("2024-09-20"));
    assert_eq!(recs[0].name.arch, "x86_64");
    assert_eq!(recs[0].name.os, "unknown");
}

#[test]
fn header_only_csv_has_no_records() {
    assert!(read_records("timestamp,site\n").is_empty());
    assert!(read_records("").is_empty());
}

#[test]
fn report_from_missing_csv_is_skipped() {
    let dir = tempdir().unwrap();
    let md = dir.path().join("report.md");
    let meta = ReportMeta::from_fetch(&FetchOptions::default());

    assert_eq!(generate_report(&dir.path().join("nope.csv"), &md, &meta).unwrap(), None);
    assert!(!md.exists());
}

#[test]
fn regenerating_a_report_is_stable() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("hpc.csv");
    let md = dir.path().join("reports/hpc.md");
    let meta = ReportMeta::from_fetch(&FetchOptions::for_facility(Facility::Frontier));
    let recs = vec![
        sample(NameLayout::Positional5, "x86_64/sles/cmpich/cce/2.0.0", Some("2024-09-23")),
        sample(NameLayout::Positional5, "x86_64/sles/cmpich/gcc/2.0.0", Some("2024-09-24")),
    ];
    save_records(&csv, &recs).unwrap();

    let body = || -> Vec<String> {
        generate_report(&csv, &md, &meta).unwrap().unwrap();
        fs::read_to_string(&md)
            .unwrap()
            .lines()
            .filter(|l| !l.starts_with("Generated on:") && !l.starts_with("*Report generated by"))
            .map(String::from)
            .collect()
    };
    let first = body();
    assert!(first.iter().any(|l| l == "- **Dates Covered**: 2024-09-23 to 2024-09-24"));
    assert_eq!(first, body());
}

#[test]
fn report_uses_the_csv_layout_over_the_facility() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("frontier.csv");
    let md = dir.path().join("report.md");
    let rec = sample(NameLayout::Positional5, "x86_64/sles/cmpich/cce/2.0.0", None);
    save_records(&csv, &[rec]).unwrap();

    let vortex_meta = ReportMeta::from_fetch(&FetchOptions::for_facility(Facility::Vortex));
    generate_report(&csv, &md, &vortex_meta).unwrap().unwrap();

    let text = fs::read_to_string(&md).unwrap();
    assert!(text.contains("| Site | Arch | OS | MPI | Compiler | Version |"));
    assert!(text.contains("| vortex.llnl.gov | x86_64 | sles | cmpich | cce | 2.0.0 |"));
}
