//! Criterion benchmarks for the three protocol operations and scanning.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use erc5564_stealth::{
    check_stealth_address, compute_stealth_key, generate_stealth_address, StealthWallet,
};

fn bench_generate(c: &mut Criterion) {
    let wallet = StealthWallet::generate().unwrap();
    let meta = *wallet.meta_address();
    let mut g = c.benchmark_group("generate");
    g.throughput(Throughput::Elements(1));
    g.bench_function("generate_stealth_address", |b| {
        b.iter(|| black_box(generate_stealth_address(&meta)).unwrap());
    });
    g.finish();
}

fn bench_check_and_recover(c: &mut Criterion) {
    let wallet = StealthWallet::generate().unwrap();
    let other = StealthWallet::generate().unwrap();
    let keys = wallet.keys();
    let ours = generate_stealth_address(wallet.meta_address()).unwrap();
    let theirs = generate_stealth_address(other.meta_address()).unwrap();

    let mut g = c.benchmark_group("check");
    g.throughput(Throughput::Elements(1));
    g.bench_function("check_match", |b| {
        b.iter(|| {
            black_box(check_stealth_address(
                &ours.stealth_address,
                &ours.ephemeral_pk,
                &keys.viewing.secret,
                &keys.spending.public,
                ours.view_tag,
            ))
            .unwrap()
        });
    });
    g.bench_function("check_foreign", |b| {
        b.iter(|| {
            black_box(check_stealth_address(
                &theirs.stealth_address,
                &theirs.ephemeral_pk,
                &keys.viewing.secret,
                &keys.spending.public,
                theirs.view_tag,
            ))
            .unwrap()
        });
    });
    g.finish();

    let mut g = c.benchmark_group("recover");
    g.throughput(Throughput::Elements(1));
    g.bench_function("compute_stealth_key", |b| {
        b.iter(|| {
            black_box(compute_stealth_key(
                &ours.stealth_address,
                &ours.ephemeral_pk,
                &keys.viewing.secret,
                &keys.spending.secret,
            ))
            .unwrap()
        });
    });
    g.finish();
}

fn bench_scan(c: &mut Criterion) {
    let wallet = StealthWallet::generate().unwrap();
    let other = StealthWallet::generate().unwrap();
    let announcements: Vec<_> = (0..256)
        .map(|i| {
            let target = if i % 64 == 0 { &wallet } else { &other };
            generate_stealth_address(target.meta_address())
                .unwrap()
                .to_announcement()
        })
        .collect();

    let mut g = c.benchmark_group("scan");
    g.throughput(Throughput::Elements(announcements.len() as u64));
    g.bench_function("scan_256", |b| {
        b.iter(|| black_box(wallet.scan(&announcements)));
    });
    g.finish();
}

criterion_group!(benches, bench_generate, bench_check_and_recover, bench_scan);
criterion_main!(benches);
