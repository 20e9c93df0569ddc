//! Benchmarks for the stress pipeline.
//!
//! Covers the rule engine alone and a full `analyze` call per strategy.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stress2health::prelude::*;

fn training_set() -> Vec<LabeledSample> {
    let mut out = Vec::new();
    for i in 0..40 {
        let d = (i % 8) as f32 * 0.15;
        let rows = [
            (4.0 + d, 29.0, Level::Low, 12.0 - d, Level::Low, Level::High),
            (6.0 + d, 24.0, Level::Medium, 9.0 - d, Level::Medium, Level::Medium),
            (8.0 + d, 21.0, Level::High, 6.0 - d, Level::High, Level::Low),
        ];
        for (sleep, bmi, activity, work, social, label) in rows {
            let sample = LifestyleSample::new(sleep, bmi, activity, work, social)
                .expect("Benchmark data should be valid");
            out.push(LabeledSample::with_level(sample, label));
        }
    }
    out
}

fn bench_assessment(c: &mut Criterion) {
    c.bench_function("comprehensive_assessment", |b| {
        b.iter(|| {
            comprehensive_assessment(
                black_box(Level::High),
                black_box(27.5),
                black_box(Level::Low),
                black_box(5.5),
            )
        });
    });

    let assessment = comprehensive_assessment(Level::High, 31.5, Level::Low, 4.5);
    c.bench_function("guide_high_risk", |b| {
        b.iter(|| guide(black_box(&assessment)));
    });
}

fn bench_analyze(c: &mut Criterion) {
    let data = training_set();
    let query = LifestyleSample::new(5.0, 28.0, Level::Low, 11.0, Level::Medium)
        .expect("Benchmark sample should be valid");
    let mut group = c.benchmark_group("analyze");

    for kind in ModelKind::ALL {
        let mut clf = StressClassifier::new(TrainingConfig::for_model(kind));
        clf.train(&data).expect("Failed to train");
        let pipeline = HealthPipeline::new(clf);

        group.bench_with_input(BenchmarkId::from_parameter(kind), &pipeline, |b, p| {
            b.iter(|| p.analyze(black_box(&query), Some("tired and stressed")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_assessment, bench_analyze);
criterion_main!(benches);
