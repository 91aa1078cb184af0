//! End-to-end run throughput over a scripted transport.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use ringdose_bench::{reference_profile, stress_profile};
use ringdose_engine::{BatchedRun, Run, RunConfig};
use ringdose_test_utils::fixtures::transmit_all;
use ringdose_test_utils::ScriptedTransport;

const EVENTS: u64 = 2_000;

fn transport() -> ScriptedTransport {
    ScriptedTransport::new(transmit_all(25.0))
}

fn sequential(config: &RunConfig) -> u64 {
    let mut run = Run::new(config, transport()).unwrap();
    run.run();
    run.finish().statistics.events
}

fn bench_runs(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    group.throughput(Throughput::Elements(EVENTS));
    group.sample_size(20);

    let reference = reference_profile(EVENTS, 1);
    group.bench_function("reference_sequential", |b| {
        b.iter(|| black_box(sequential(&reference)));
    });

    let stress = stress_profile(EVENTS, 1);
    group.bench_function("stress_sequential", |b| {
        b.iter(|| black_box(sequential(&stress)));
    });

    let mut batched = reference_profile(EVENTS, 1);
    batched.worker_count = Some(4);
    group.bench_function("reference_batched_4", |b| {
        b.iter_batched(
            || BatchedRun::new(batched.clone(), transport()).unwrap(),
            |run| black_box(run.run().unwrap().statistics.events),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_runs);
criterion_main!(benches);
