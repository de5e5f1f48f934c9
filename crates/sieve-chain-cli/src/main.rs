#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use clap::Parser;
use config::{CliArgs, RunConfig, RuntimeKind};
use sieve_chain::{LineSink, Pipeline, PipelineSmolExt, PipelineTokioExt, Summary};
use std::sync::Arc;
use telemetry::init_tracing;

// One small allocation per spawned stage adds up on deep chains.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = RunConfig::try_from(args)?;

    init_tracing();
    log_startup_info(&config);

    let sink = Arc::new(LineSink::stdout());
    let pipeline = Pipeline::new(config.pipeline, Arc::clone(&sink));

    let summary = match config.runtime {
        RuntimeKind::Tokio => {
            let rt = build_tokio_runtime(config.worker_threads)?;
            rt.block_on(pipeline.run_tokio())?
        }
        RuntimeKind::Smol => smol::block_on(pipeline.run_smol())?,
    };

    sink.flush()?;

    #[cfg(feature = "tracing")]
    tracing::info!(
        candidates = summary.candidates,
        stages = summary.stages,
        primes = summary.primes,
        "Sieve complete"
    );

    if config.summary {
        print_summary(&summary);
    }

    Ok(())
}

fn build_tokio_runtime(worker_threads: Option<usize>) -> anyhow::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    if let Some(threads) = worker_threads {
        builder.worker_threads(threads);
    }
    Ok(builder.thread_name("sieve-stage").build()?)
}

fn log_startup_info(_config: &RunConfig) {
    if cfg!(debug_assertions) {
        #[cfg(feature = "tracing")]
        tracing::debug!("Starting sieve with full config: {:#?}", _config);
    } else {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Starting sieve over [{}, {}] on {:?}",
            _config.pipeline.range.low(),
            _config.pipeline.range.high(),
            _config.runtime
        );
    }
}

fn print_summary(summary: &Summary) {
    eprintln!(
        "candidates: {}, stages: {}, primes: {}",
        summary.candidates, summary.stages, summary.primes
    );
}
