// benches/decompose.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use cdash_scrape::{
    decompose::{decompose, NameLayout},
    specs::page,
};

const NAMES: [&str; 6] = [
    "x86_64/suse-es-15-sp6/cmpich-8.1.31/cce-18.0.1/2.0.0-2",
    "x86_64/sles-15/cray-mpich-8.1.28/gcc-12.3/2.0.0/extra",
    "2.0.0-2/crusher/foo",
    "frontier-nightly",
    "2.0.0-2/spectrum-mpi/gcc-12.2.1/Linux 4.14.0 ppc64le-vortex----",
    "",
];

/// A project page with `rows` builds in one `tabb` table.
fn synthetic_page(rows: usize) -> String {
    let mut html = String::from(
        "<html><body><table class=\"tabb\"><tr><th>Site</th><th>Build Name</th><th>Stamp</th></tr>",
    );
    for i in 0..rows {
        html.push_str(&format!(
            "<tr><td><a href=\"viewSite.php?siteid={i}\">site{i}.example</a></td>\
             <td>x86_64/sles/cmpich/gcc-{i}/2.0.0</td><td>20240924-0000-Nightly</td>\
             <td>0</td><td>1</td><td>0</td><td>0</td><td>{i} warnings</td><td>0</td><td>1</td><td>3199</td></tr>"
        ));
    }
    html.push_str("</table></body></html>");
    html
}

fn bench_decompose(c: &mut Criterion) {
    c.bench_function("decompose_mixed", |b| {
        b.iter(|| {
            for name in NAMES {
                black_box(decompose(NameLayout::Positional5, black_box(name)));
                black_box(decompose(NameLayout::Positional4, black_box(name)));
            }
        })
    });
}

fn bench_build_table(c: &mut Criterion) {
    let doc = synthetic_page(400);

    c.bench_function("parse_build_table_400", |b| {
        b.iter(|| {
            let rows = page::parse_build_table(black_box(&doc));
            black_box(rows.len())
        })
    });
}

criterion_group!(benches, bench_decompose, bench_build_table);
criterion_main!(benches);
