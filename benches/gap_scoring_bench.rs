//! Gap scoring against the bundled ISO 13485 catalog.

use criterion::{criterion_group, criterion_main, Criterion};
use qmsrisk::{ChecklistCatalog, ComplianceStatus, GapScorer, GapStatuses};
use std::hint::black_box;

const CATALOG: &str = include_str!("../data/iso13485_gap_catalog.toml");

fn bench_score(c: &mut Criterion) {
    let scorer = GapScorer::new(ChecklistCatalog::from_toml_str(CATALOG).unwrap());
    let statuses: GapStatuses = scorer
        .catalog()
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let status = match i % 3 {
                0 => ComplianceStatus::Compliant,
                1 => ComplianceStatus::Partial,
                _ => ComplianceStatus::NonCompliant,
            };
            (item.id.clone(), status)
        })
        .collect();

    c.bench_function("gap_score", |b| b.iter(|| black_box(scorer.score(&statuses))));
    c.bench_function("gap_category_breakdown", |b| {
        b.iter(|| black_box(scorer.category_breakdown(&statuses)))
    });
}

criterion_group!(benches, bench_score);
criterion_main!(benches);
