//! # `sieve-chain`: a pipelined prime sieve
//!
//! Primes are discovered by a chain of stage tasks. Each stage owns one prime
//! (its *base*), drops every candidate divisible by it, and forwards the
//! survivors to a successor stage that it spawns the first time it has
//! something to forward. Stages talk only through bounded single-producer /
//! single-consumer channels, so a slow tail throttles the whole chain.
//!
//! Termination flows down the chain: the driver closes the first channel,
//! each stage drains its inbound, closes its outbound and joins its
//! successor before finishing. No stage outlives its parent.
//!
//! ## Runtimes
//!
//! The pipeline is generic over a [`Runtime`], which supplies the channel and
//! the task spawner:
//!
//! - [`TokioRuntime`] (feature `async-tokio`)
//! - [`SmolRuntime`] (feature `async-smol`)
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "async-tokio")]
//! # {
//! use std::sync::Arc;
//! use sieve_chain::{CandidateRange, CollectSink, Pipeline, PipelineConfig, TokioRuntime};
//!
//! let rt = tokio::runtime::Builder::new_multi_thread().build().unwrap();
//! let sink = Arc::new(CollectSink::default());
//! let config = PipelineConfig::new(CandidateRange::new(2, 10).unwrap(), 1).unwrap();
//!
//! let summary = rt
//!     .block_on(Pipeline::new(config, Arc::clone(&sink)).run::<TokioRuntime>())
//!     .unwrap();
//!
//! assert_eq!(sink.primes(), vec![2, 3, 5, 7]);
//! assert_eq!(summary.stages, 4);
//! # }
//! ```
//!
//! ## Features
//!
//! - `async-tokio`: Tokio channels and tasks.
//! - `async-smol`: Smol channels and tasks.
//! - `tracing`: emits stage lifecycle events through the `tracing` crate.

mod error;
mod pipeline;
mod range;
mod runtime;
mod sink;
mod stage;
mod transport;

pub use crate::error::*;
pub use crate::pipeline::*;
pub use crate::range::*;
pub use crate::runtime::*;
pub use crate::sink::*;
pub use crate::stage::ChainStats;
pub use crate::transport::*;
