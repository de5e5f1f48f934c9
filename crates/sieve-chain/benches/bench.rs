use core::hint::black_box;
use criterion::async_executor::SmolExecutor;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sieve_chain::{
    CandidateRange, Pipeline, PipelineConfig, PrimeSink, Result, Runtime, SmolRuntime,
    TokioRuntime,
};
use std::sync::Arc;
use tokio::runtime::Builder;

/// Discards primes so the benchmark measures the chain, not the output.
struct NullSink;

impl PrimeSink for NullSink {
    fn emit(&self, prime: u64) -> Result<()> {
        black_box(prime);
        Ok(())
    }
}

const BOUNDS: [u64; 3] = [1_000, 5_000, 20_000];
const CAPACITIES: [usize; 3] = [1, 16, 256];

fn pipeline(high: u64, capacity: usize) -> Pipeline<NullSink> {
    let config = PipelineConfig::new(CandidateRange::up_to(high), capacity).unwrap();
    Pipeline::new(config, Arc::new(NullSink))
}

async fn run<R: Runtime>(high: u64, capacity: usize) {
    let summary = pipeline(high, capacity).run::<R>().await.unwrap();
    black_box(summary);
}

fn bench_tokio(c: &mut Criterion) {
    let rt = Builder::new_multi_thread().enable_all().build().unwrap();
    let mut group = c.benchmark_group("tokio");

    for high in BOUNDS {
        group.throughput(Throughput::Elements(high - 1));
        for capacity in CAPACITIES {
            group.bench_with_input(
                BenchmarkId::new(format!("cap/{capacity}"), high),
                &high,
                |b, &high| b.to_async(&rt).iter(|| run::<TokioRuntime>(high, capacity)),
            );
        }
    }

    group.finish();
}

fn bench_tokio_current_thread(c: &mut Criterion) {
    let rt = Builder::new_current_thread().enable_all().build().unwrap();
    let mut group = c.benchmark_group("tokio_current_thread");

    for high in BOUNDS {
        group.throughput(Throughput::Elements(high - 1));
        group.bench_with_input(BenchmarkId::new("cap/1", high), &high, |b, &high| {
            b.to_async(&rt).iter(|| run::<TokioRuntime>(high, 1))
        });
    }

    group.finish();
}

fn bench_smol(c: &mut Criterion) {
    let mut group = c.benchmark_group("smol");

    for high in BOUNDS {
        group.throughput(Throughput::Elements(high - 1));
        for capacity in CAPACITIES {
            group.bench_with_input(
                BenchmarkId::new(format!("cap/{capacity}"), high),
                &high,
                |b, &high| b.to_async(SmolExecutor).iter(|| run::<SmolRuntime>(high, capacity)),
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_tokio,
    bench_tokio_current_thread,
    bench_smol
);
criterion_main!(benches);
