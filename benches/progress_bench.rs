//! Benchmark suite for danci-progress
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use danci_progress::{
    evaluate_curriculum, AttemptOutcome, EngineConfig, ExternalSignals, PracticeRecord, ProgressEngine, Snapshot,
    CURRICULUM,
};

fn build_snapshot(items: usize) -> Snapshot {
    let categories: Vec<&str> = CURRICULUM.iter().flat_map(|p| p.categories.iter().copied()).collect();
    (0..items)
        .map(|i| {
            let attempts = (i % 17) as i64 + 1;
            let history = (0..attempts)
                .map(|k| AttemptOutcome { at: (i as i64) * 100 + k, correct: (i + k as usize) % 4 != 0 })
                .collect();
            let record = PracticeRecord::new(categories[i % categories.len()], attempts, attempts * 3 / 4, (i % 5) as i64)
                .with_pattern(format!("p{}", i % 7))
                .with_history(history);
            (format!("item{i:05}"), record)
        })
        .collect()
}

fn bench_evaluate_curriculum(c: &mut Criterion) {
    let records = build_snapshot(2_000);
    c.bench_function("evaluate_curriculum/2000", |b| {
        b.iter(|| evaluate_curriculum(black_box(&records), CURRICULUM))
    });
}

fn bench_full_report(c: &mut Criterion) {
    let records = build_snapshot(2_000);
    let engine = ProgressEngine::new(EngineConfig::default()).expect("engine");
    let signals = ExternalSignals { review_due_count: 12, weak_item_count: 4 };

    c.bench_function("report/uncached/2000", |b| {
        b.iter(|| {
            engine.invalidate();
            engine.evaluate(black_box(&records), signals)
        })
    });
    c.bench_function("report/cached/2000", |b| b.iter(|| engine.evaluate(black_box(&records), signals)));
}

criterion_group!(benches, bench_evaluate_curriculum, bench_full_report);
criterion_main!(benches);
