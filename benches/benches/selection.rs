// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use trellis_selection::{SelectionEngine, SelectionOptions};

fn engine(multiple: bool) -> SelectionEngine<u32> {
    SelectionEngine::uncontrolled(SelectionOptions {
        multiple,
        deselect_on_reselect: true,
    })
}

fn bench_multi_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/multi_toggle");

    // Toggling in multi mode scans the current value, so selecting n distinct
    // values is quadratic in n.
    for len in [16u32, 128, 1_024] {
        group.throughput(Throughput::Elements(u64::from(len)));

        group.bench_with_input(BenchmarkId::new("select_all", len), &len, |b, &len| {
            b.iter_batched(
                || engine(true),
                |engine| {
                    for v in 0..len {
                        engine.select(v);
                    }
                    black_box(engine);
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("select_then_clear", len), &len, |b, &len| {
            b.iter_batched(
                || {
                    let engine = engine(true);
                    for v in 0..len {
                        engine.select(v);
                    }
                    engine
                },
                |engine| {
                    for v in (0..len).rev() {
                        engine.select(v);
                    }
                    black_box(engine);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_single_with_subscribers(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/single_subscribers");

    for subscribers in [0usize, 8, 64] {
        let engine = engine(false);
        let _disposers: Vec<_> = (0..subscribers)
            .map(|_| {
                engine.subscribe(|new, _| {
                    black_box(new);
                })
            })
            .collect();

        let mut next = 0u32;
        group.bench_function(BenchmarkId::new("select", subscribers), |b| {
            b.iter(|| {
                next = next.wrapping_add(1);
                engine.select(black_box(next));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_multi_toggle, bench_single_with_subscribers);
criterion_main!(benches);
