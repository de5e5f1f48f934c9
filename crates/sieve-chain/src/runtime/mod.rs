#[cfg(feature = "async-smol")]
mod smol;
#[cfg(feature = "async-tokio")]
mod tokio;

#[cfg(feature = "async-smol")]
pub use self::smol::*;
#[cfg(feature = "async-tokio")]
pub use self::tokio::*;

use crate::{Consumer, Producer, Result};
use core::future::Future;

/// A trait that abstracts over the async runtime a pipeline runs on.
///
/// A runtime supplies the two primitives the sieve needs: a bounded
/// single-producer / single-consumer channel and a way to spawn a stage as an
/// independently scheduled task whose completion can be awaited.
///
/// Implementors are zero-sized markers; nothing is stored per pipeline.
pub trait Runtime: Send + Sync + 'static {
    type Producer: Producer;
    type Consumer: Consumer;

    /// Handle to a spawned task. Resolves once the task has fully exited.
    type JoinHandle<T: Send + 'static>: Future<Output = Result<T>> + Send + 'static;

    /// Opens a channel that buffers at most `capacity` values.
    ///
    /// `capacity` must be non-zero; [`crate::PipelineConfig`] enforces this
    /// before any channel is opened.
    fn open(capacity: usize) -> (Self::Producer, Self::Consumer);

    /// Schedules `fut` to run concurrently with the caller.
    fn spawn<F, T>(fut: F) -> Self::JoinHandle<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static;
}
