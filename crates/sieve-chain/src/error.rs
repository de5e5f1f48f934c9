//! Error types for the sieve pipeline.
//!
//! A sieve run is a single closed computation, so none of these errors are
//! recovered mid-pipeline. The first failure tears the run down and surfaces
//! from [`crate::Pipeline::run`].
//!
//! ## Error Cases
//! - `TransportClosed`: a send hit a channel whose consumer is gone.
//! - `StageJoin`: a stage task panicked or was aborted by its runtime.
//! - `InvalidRange`: the candidate range starts below 2.
//! - `InvalidCapacity`: a zero-capacity channel was requested.
//! - `Sink`: writing a discovered prime to the output failed.

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors that `sieve-chain` can produce.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The consumer end of a channel was dropped while its producer was still
    /// sending. Stages only stop reading after they observe closure, so this
    /// means a downstream stage died early.
    #[error("Transport closed: consumer end dropped before the producer finished")]
    TransportClosed,

    /// A spawned stage could not be joined cleanly.
    #[error("Stage join failed: {context}")]
    StageJoin { context: String },

    /// The lower bound would seed the chain with a non-prime base.
    #[error("Invalid candidate range [{low}, {high}]: low must be at least 2")]
    InvalidRange { low: u64, high: u64 },

    /// Channels need room for at least one value.
    #[error("Invalid channel capacity {0}: must be at least 1")]
    InvalidCapacity(usize),

    /// The prime sink rejected a value.
    #[error("Failed to emit prime {prime}: {source}")]
    Sink {
        prime: u64,
        #[source]
        source: std::io::Error,
    },
}
