// Copyright 2025 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sufsort::SuffixArray;

const SIZES: [usize; 4] = [1 << 10, 1 << 12, 1 << 14, 1 << 16];

/// Deterministic lowercase filler so runs are comparable across machines.
fn synthetic_text(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491_4f6c_dd1du64;
    let mut data: Vec<u8> = (0..len)
        .map(|_| {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            b'a' + (state >> 59) as u8 % 26
        })
        .collect();
    data.push(0);

    data
}

fn construct(c: &mut Criterion) {
    let mut group = c.benchmark_group("construct");

    for size in SIZES {
        let data = synthetic_text(size);

        group
            .throughput(Throughput::Bytes(data.len() as u64))
            .bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
                b.iter(|| SuffixArray::new(data));
            });
    }

    group.finish();
}

criterion_group!(benches, construct);
criterion_main!(benches);
