use anyhow::bail;
use clap::{Parser, ValueEnum};
use sieve_chain::{CandidateRange, DEFAULT_CAPACITY, DEFAULT_HIGH, MIN_LOW, PipelineConfig};

/// Async runtime that schedules the sieve stages.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    /// Tokio multi-threaded scheduler.
    Tokio,
    /// Smol global executor.
    Smol,
}

/// Runtime configuration for the `primes` binary.
///
/// Every flag can also be set through the environment (or a `.env` file).
/// With no arguments the binary reproduces the classic run over `[2, 35]`.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "primes",
    version,
    about = "Print primes using a chain of concurrent sieve stages"
)]
pub struct CliArgs {
    /// Smallest value to report. Must be at least 2.
    ///
    /// Environment variable: `PRIMES_LOW`
    #[arg(long, env = "PRIMES_LOW", default_value_t = MIN_LOW)]
    pub low: u64,

    /// Largest value to report (inclusive).
    ///
    /// A value below `low` is an empty range and prints nothing.
    ///
    /// Environment variable: `PRIMES_HIGH`
    #[arg(long, env = "PRIMES_HIGH", default_value_t = DEFAULT_HIGH)]
    pub high: u64,

    /// Number of values each inter-stage channel buffers.
    ///
    /// Lower values tighten backpressure between neighbouring stages; higher
    /// values let a stage run further ahead of its successor.
    ///
    /// Environment variable: `CHANNEL_CAPACITY`
    #[arg(long, env = "CHANNEL_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Runtime used to schedule stages.
    ///
    /// Environment variable: `PRIMES_RUNTIME`
    #[arg(long, env = "PRIMES_RUNTIME", value_enum, default_value_t = RuntimeKind::Tokio)]
    pub runtime: RuntimeKind,

    /// Worker threads for the Tokio runtime. Defaults to one per core.
    ///
    /// Environment variable: `WORKER_THREADS`
    #[arg(long, env = "WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// Print the number of candidates, stages and primes to stderr when done.
    #[arg(short, long, default_value_t = false)]
    pub summary: bool,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub pipeline: PipelineConfig,
    pub runtime: RuntimeKind,
    pub worker_threads: Option<usize>,
    pub summary: bool,
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.low < MIN_LOW {
            bail!("PRIMES_LOW ({}) must be at least {}", args.low, MIN_LOW);
        }

        if args.capacity == 0 {
            bail!("CHANNEL_CAPACITY must be greater than 0");
        }

        if args.worker_threads == Some(0) {
            bail!("WORKER_THREADS must be greater than 0");
        }

        if args.worker_threads.is_some() && args.runtime != RuntimeKind::Tokio {
            bail!("WORKER_THREADS only applies to the tokio runtime");
        }

        let range = CandidateRange::new(args.low, args.high)?;
        let pipeline = PipelineConfig::new(range, args.capacity)?;

        Ok(Self {
            pipeline,
            runtime: args.runtime,
            worker_threads: args.worker_threads,
            summary: args.summary,
        })
    }
}
