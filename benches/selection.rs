use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use topica::{CosineKmeans, FeatureMatrix, ModelSelector};

/// `topics` noisy directions in `d` dimensions, `per_topic` rows each.
fn synthetic(topics: usize, per_topic: usize, d: usize, seed: u64) -> FeatureMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(topics * per_topic);
    for t in 0..topics {
        for _ in 0..per_topic {
            let mut v: Vec<f64> = (0..d).map(|_| rng.random::<f64>() * 0.2).collect();
            v[t % d] += 1.0;
            rows.push(v);
        }
    }
    FeatureMatrix::from_rows(&rows).unwrap()
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("cosine_kmeans");
    let data = synthetic(8, 125, 64, 42);

    group.bench_function("fit_n1000_d64_k8", |b| {
        b.iter(|| {
            let model = CosineKmeans::new(8).with_max_iter(20).with_seed(42);
            model.fit(black_box(&data)).unwrap();
        })
    });

    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_selection");
    group.sample_size(10);
    let data = synthetic(5, 60, 32, 7);

    group.bench_function("select_n300_d32_k2to10", |b| {
        b.iter(|| {
            let selector = ModelSelector::new(2, 10).with_max_iter(50);
            selector.select(black_box(&data)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_kmeans, bench_selection);
criterion_main!(benches);
