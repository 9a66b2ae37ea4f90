//! # Mailserver Ping Benchmarks
//!
//! | Stage | Work per descriptor | Target |
//! |-------|---------------------|--------|
//! | Enode normalization | URL parse + curve check | < 50µs |
//! | Multiaddr normalization | segment parse | < 5µs |
//! | Correlation table | hash insert | < 1µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use mailserver_ping::testing::enode_url;
use mailserver_ping::{
    enode_to_target, CanonicalTarget, CorrelationTable, MultiaddrEndpoint, PeerDescriptor,
    PeerError,
};

fn bench_enode_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("enode-normalization");
    group.measurement_time(Duration::from_secs(5));

    let address = enode_url(7, "10.0.0.1", 30303);
    group.bench_function("enode_to_target", |b| {
        b.iter(|| black_box(enode_to_target(black_box(&address))))
    });

    let malformed = "enode://zz@10.0.0.1:30303";
    group.bench_function("enode_to_target_malformed", |b| {
        b.iter(|| black_box(enode_to_target(black_box(malformed))))
    });

    group.finish();
}

fn bench_multiaddr_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiaddr-normalization");

    let literal = "/ip4/10.0.0.1/tcp/30303/ws";
    let named = "/dns4/node-01.example.org/tcp/443/wss";
    group.bench_function("ip4_tcp_ws", |b| {
        b.iter(|| black_box(MultiaddrEndpoint::parse(black_box(literal))))
    });
    group.bench_function("dns4_tcp_wss", |b| {
        b.iter(|| black_box(MultiaddrEndpoint::parse(black_box(named))))
    });

    group.finish();
}

fn bench_correlation_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation-table");

    for size in [10usize, 100, 1_000] {
        // Groups of four descriptors share one target.
        let descriptors: Vec<PeerDescriptor> = (0..size)
            .map(|i| PeerDescriptor::new(format!("peer-{i}")))
            .collect();
        let normalize = |d: &PeerDescriptor| -> Result<CanonicalTarget, PeerError> {
            let i: usize = d.as_str()[5..].parse().unwrap_or(0);
            Ok(CanonicalTarget::new(
                format!("10.0.{}.{}", (i / 4) / 256, (i / 4) % 256),
                30303,
            ))
        };

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("build", size), &descriptors, |b, d| {
            b.iter(|| black_box(CorrelationTable::build_with(d, normalize)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_enode_normalization,
    bench_multiaddr_parse,
    bench_correlation_table
);
criterion_main!(benches);
