use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::{design_matrix, FeatureExtractor};
use sensor_data::{synthesize, SynthConfig};
use trainer::LogisticRegression;

fn bench_fit(c: &mut Criterion) {
    let samples = synthesize(&SynthConfig::default());
    let features = FeatureExtractor::new().extract_all(&samples);
    let labels: Vec<u8> = samples.iter().map(|s| s.label.unwrap_or(0)).collect();
    let x = design_matrix(&features);
    let solver = LogisticRegression::new();

    c.bench_function("logistic_fit_800", |b| {
        b.iter(|| solver.fit(black_box(x.view()), black_box(&labels)))
    });
}

criterion_group!(benches, bench_fit);
criterion_main!(benches);
