use std::hint::black_box;

use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};
use pastelens::{classify, inspect, ClassifierConfig};
use pastelens_crypto::{encrypt, BlockMode, CipherProfile, KeyMaterial, SymmetricProfile};

fn profiles(count: usize) -> Vec<CipherProfile> {
    (0 .. count)
        .map(|i| {
            SymmetricProfile::builder(format!("profile-{}", i))
                .mode(if i % 2 == 0 { BlockMode::Cbc } else { BlockMode::Ctr })
                .key(KeyMaterial::text(format!("{:016}", i)))
                .iv(KeyMaterial::text("fedcba9876543210"))
                .build()
                .unwrap()
                .into()
        })
        .collect()
}

fn bench_syntactic_rules(c: &mut Criterion) {
    let inputs = [
        "192.168.1.0/24",
        "0 0 * * *",
        "1111111111",
        "2024-03-15T10:30:00Z",
        "https://example.com/a?b=c",
        "example.com",
        "MTIzNA==",
    ];

    c.bench_function("classify_syntactic", |b| {
        b.iter(|| {
            for input in inputs {
                black_box(classify(black_box(input), &[]));
            }
        })
    });
}

fn bench_decryption_sweep(c: &mut Criterion) {
    let mut profiles = profiles(16);
    let target: CipherProfile = SymmetricProfile::builder("target")
        .mode(BlockMode::Cfb)
        .key(KeyMaterial::text("0123456789abcdef"))
        .iv(KeyMaterial::text("fedcba9876543210"))
        .build()
        .unwrap()
        .into();
    let ciphertext = encrypt("The quick brown fox jumps over the lazy dog", &target).unwrap();
    profiles.push(target);

    c.bench_function("classify_sweep_17_profiles", |b| {
        b.iter(|| black_box(classify(black_box(&ciphertext), &profiles)))
    });
}

fn bench_inspect_cron(c: &mut Criterion) {
    let config = ClassifierConfig::default();
    let now = Utc::now();

    c.bench_function("inspect_cron_next_runs", |b| {
        b.iter(|| black_box(inspect(black_box("*/15 9-17 * * MON-FRI"), &[], &config, now).unwrap()))
    });
}

criterion_group!(benches, bench_syntactic_rules, bench_decryption_sweep, bench_inspect_cron);
criterion_main!(benches);
