use criterion::{criterion_group, criterion_main, Criterion};
use monkey::parse;
use std::hint::black_box;

static INPUT: &str = include_str!("../fixtures/big.monkey");

fn parser(input: &str) {
    let program = parse(input).unwrap();
    _ = black_box(program);
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("parser", |b| {
        b.iter(|| {
            black_box(parser(black_box(INPUT)));
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
