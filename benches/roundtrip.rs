use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lweq::{decrypt, encrypt, generate_keys, EntropySource};

const MESSAGE: &str = "benchmark payload, printable ascii only";

fn keygen_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("keygen");
    for modulus in [23u64, 101, 251, 499] {
        group.bench_with_input(BenchmarkId::from_parameter(modulus), &modulus, |b, &q| {
            let mut source = EntropySource::with_seed(q);
            b.iter(|| generate_keys(q, &mut source).unwrap());
        });
    }
    group.finish();
}

fn encrypt_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt");
    for modulus in [23u64, 101, 251, 499] {
        let mut source = EntropySource::with_seed(modulus);
        let (_, public) = generate_keys(modulus, &mut source).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(modulus), &modulus, |b, _| {
            b.iter(|| encrypt(&public, MESSAGE, &mut source).unwrap());
        });
    }
    group.finish();
}

fn decrypt_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("decrypt");
    for modulus in [23u64, 101, 251, 499] {
        let mut source = EntropySource::with_seed(modulus);
        let (secret, public) = generate_keys(modulus, &mut source).unwrap();
        let ciphertext = encrypt(&public, MESSAGE, &mut source).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(modulus), &modulus, |b, _| {
            b.iter(|| decrypt(&secret, &ciphertext).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, keygen_benchmark, encrypt_benchmark, decrypt_benchmark);
criterion_main!(benches);
