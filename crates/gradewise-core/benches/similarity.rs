use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gradewise_core::risk::compute_risk;
use gradewise_core::similarity::cosine_similarity;

fn essay(words: usize, seed: usize) -> String {
    let vocab = [
        "stack", "queue", "element", "push", "pop", "order", "first", "last", "because",
        "example", "buffer", "memory", "pointer", "array", "linked", "node", "front", "back",
    ];
    (0..words)
        .map(|i| vocab[(i * 7 + seed) % vocab.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_cosine(c: &mut Criterion) {
    let mut group = c.benchmark_group("cosine_similarity");

    let short_a = essay(30, 1);
    let short_b = essay(30, 2);
    let long_a = essay(1_000, 3);
    let long_b = essay(1_000, 4);

    group.bench_function("30_words", |b| {
        b.iter(|| cosine_similarity(black_box(&short_a), black_box(&short_b)))
    });

    group.bench_function("1000_words", |b| {
        b.iter(|| cosine_similarity(black_box(&long_a), black_box(&long_b)))
    });

    group.bench_function("identical", |b| {
        b.iter(|| cosine_similarity(black_box(&long_a), black_box(&long_a)))
    });

    group.finish();
}

fn bench_risk(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_risk");

    let submission = essay(300, 5);
    let peers_10: Vec<String> = (0..10).map(|i| essay(300, i)).collect();
    let peers_100: Vec<String> = (0..100).map(|i| essay(300, i)).collect();

    group.bench_function("10_peers", |b| {
        b.iter(|| compute_risk(black_box(&submission), black_box(&peers_10)))
    });

    group.bench_function("100_peers", |b| {
        b.iter(|| compute_risk(black_box(&submission), black_box(&peers_100)))
    });

    group.finish();
}

criterion_group!(benches, bench_cosine, bench_risk);
criterion_main!(benches);
