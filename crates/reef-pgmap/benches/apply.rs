// Copyright 2026 The Reef Authors
// SPDX-License-Identifier: Apache-2.0

//! Delta application and snapshot codec benchmarks.

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use reef_core::{DeviceUsage, PgStats, PgStatus};
use reef_pgmap::{decode_map, encode_map, PgMap, PgMapDelta};

/// Build a map tracking `pgs` placement groups and `devices` devices.
fn populate(pgs: u32, devices: i32) -> PgMap {
    let mut map = PgMap::new();
    let mut delta = PgMapDelta::new(1);
    for id in 0..pgs {
        let status = if id % 16 == 0 {
            PgStatus::CREATING
        } else {
            PgStatus::ACTIVE | PgStatus::CLEAN
        };
        let stats = PgStats::new(status).with_usage(u64::from(id) * 4096, u64::from(id) * 4, 32);
        delta = delta.update_pg(id, stats);
    }
    for id in 0..devices {
        delta = delta.update_device(id, DeviceUsage::new(1 << 30, 1 << 20, (1 << 30) - (1 << 20)));
    }
    map.apply(&delta).expect("populate delta");
    map
}

/// A follow-up delta touching `touched` existing groups.
fn update_delta(version: u64, touched: u32) -> PgMapDelta {
    let mut delta = PgMapDelta::new(version);
    for id in 0..touched {
        delta = delta
            .update_pg(id, PgStats::new(PgStatus::ACTIVE | PgStatus::CLEAN).with_usage(8192, 8, 64));
    }
    delta
}

/// Benchmark applying a delta against maps of various sizes.
///
/// Cost should track the number of touched entities, not the table size.
fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_delta");

    for (map_pgs, touched) in [(1_000u32, 16u32), (10_000, 16), (100_000, 16), (10_000, 1_000)] {
        let map = populate(map_pgs, 16);
        let delta = update_delta(2, touched);

        group.throughput(Throughput::Elements(u64::from(touched)));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{map_pgs}pgs_{touched}touched")),
            &delta,
            |b, delta| {
                b.iter_batched(
                    || map.clone(),
                    |mut map| map.apply(delta).expect("apply"),
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark full-snapshot encode and rebuild-on-decode.
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_codec");

    for map_pgs in [1_000u32, 10_000, 100_000] {
        let map = populate(map_pgs, 64);
        let bytes = encode_map(&map).expect("encode");

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", map_pgs), &map, |b, map| {
            b.iter(|| encode_map(map).expect("encode"));
        });
        group.bench_with_input(BenchmarkId::new("decode", map_pgs), &bytes, |b, bytes| {
            b.iter(|| decode_map(bytes).expect("decode"));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply, bench_codec);
criterion_main!(benches);
