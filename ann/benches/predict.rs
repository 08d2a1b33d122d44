use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ann::{Matrix, Network};

criterion_main!(benches);
criterion_group!(benches, predict_mnist_sized, multiply_square);

pub fn predict_mnist_sized(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let network = Network::random(&[784, 16, 16, 10], &mut rng).unwrap();
    let input = Matrix::column((0..784).map(|_| rng.gen_range(0.0..1.0)).collect());

    c.benchmark_group("benches")
        .measurement_time(Duration::from_secs(10))
        .bench_function("predict_784_16_16_10", |b| {
            b.iter(|| network.predict(black_box(&input)))
        });
}

pub fn multiply_square(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let mut random = |size: usize| {
        let values = (0..size * size).map(|_| rng.gen_range(-1.0..1.0)).collect();
        Matrix::from_values(size, size, values).unwrap()
    };
    let a = random(64);
    let b = random(64);

    c.bench_function("multiply_64x64", |bencher| {
        bencher.iter(|| black_box(&a).multiply(black_box(&b)))
    });
}
