use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use insight_clustering::algorithms::{cosine_similarity, KMeans};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_vectors(n: usize, dim: usize) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..n)
        .map(|_| (0..dim).map(|_| rng.random_range(-1.0f32..1.0)).collect())
        .collect()
}

fn bench_cosine(c: &mut Criterion) {
    let v = random_vectors(2, 384);
    c.bench_function("cosine_384", |b| {
        b.iter(|| cosine_similarity(&v[0], &v[1]).unwrap())
    });
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_fit");
    for n in [20usize, 100, 500] {
        let vectors = random_vectors(n, 384);
        group.bench_with_input(BenchmarkId::from_parameter(n), &vectors, |b, vectors| {
            b.iter(|| KMeans::new(5).with_seed(Some(1)).fit(vectors).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cosine, bench_kmeans);
criterion_main!(benches);
