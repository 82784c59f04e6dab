// benches/report.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use score_watch::diff::diff;
use score_watch::specs::report::{parse_doc, ReportSpec};
use score_watch::Record;

const SAMPLE: &str = include_str!("../tests/fixtures/report_page.html");

/// A full transcript's worth of rows.
fn big_page(rows: usize) -> String {
    let mut doc = String::from(
        "<html><body><table id=\"dataList\"><tr><th>序号</th><th>开课学期</th>\
         <th>课程名称</th><th>总成绩</th><th>学分</th></tr>",
    );
    for i in 0..rows {
        doc.push_str(&format!(
            "<tr><td>{i}</td><td>2019-2020-{}</td><td align=\"left\">课程&nbsp;{i}</td>\
             <td><a href=\"javascript:JsMod('/x?id={i}',700,500)\">{}</a></td><td>2</td></tr>",
            i % 2 + 1,
            60 + i % 40
        ));
    }
    doc.push_str("</table></body></html>");
    doc
}

fn bench_parse(c: &mut Criterion) {
    let spec = ReportSpec::default();
    let big = big_page(80);

    c.bench_function("report_sample", |b| {
        b.iter(|| {
            let rows = parse_doc(black_box(SAMPLE), &spec).unwrap();
            black_box(rows.len())
        })
    });

    c.bench_function("report_80_rows", |b| {
        b.iter(|| {
            let rows = parse_doc(black_box(&big), &spec).unwrap();
            black_box(rows.len())
        })
    });
}

fn bench_diff(c: &mut Criterion) {
    let spec = ReportSpec::default();
    let current: Vec<Record> = parse_doc(&big_page(80), &spec).unwrap();
    let previous: Vec<Record> = current[..75].to_vec();

    c.bench_function("diff_80_vs_75", |b| {
        b.iter(|| black_box(diff(black_box(&previous), black_box(&current)).len()))
    });
}

criterion_group!(benches, bench_parse, bench_diff);
criterion_main!(benches);
