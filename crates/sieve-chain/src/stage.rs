//! The stage worker: one task per discovered prime.
//!
//! A stage reads its first value as its base, reports it, then filters the
//! rest of its inbound stream. Survivors go to a successor stage that is
//! spawned on the first survivor. When the inbound stream ends the stage
//! closes its outbound channel and joins the successor, so the chain shuts
//! down from the head to the tail and finishes from the tail to the head.

use crate::{CandidateRange, Consumer, Error, PrimeSink, Producer, Result, Runtime};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;

/// Totals reported back up the chain as stages finish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainStats {
    /// Stages that found a base, this one and every descendant.
    pub stages: usize,
    /// Primes handed to the sink. Lower than `stages` when the range floor
    /// is above 2.
    pub primes: usize,
}

/// Read-only settings every stage carries. Cloned into each new stage.
pub(crate) struct StageContext<S> {
    pub(crate) sink: Arc<S>,
    pub(crate) range: CandidateRange,
    pub(crate) capacity: usize,
}

impl<S> Clone for StageContext<S> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            range: self.range,
            capacity: self.capacity,
        }
    }
}

/// The producer end of a spawned stage together with its join handle.
pub(crate) struct Successor<R: Runtime> {
    outbound: R::Producer,
    join: R::JoinHandle<ChainStats>,
}

impl<R: Runtime> Successor<R> {
    /// Opens a channel and spawns a stage reading from it.
    pub(crate) fn spawn<S: PrimeSink>(depth: usize, ctx: &StageContext<S>) -> Self {
        let (outbound, inbound) = R::open(ctx.capacity);

        #[cfg(feature = "tracing")]
        tracing::trace!("Spawning stage {}", depth);

        let join = R::spawn(run_stage::<R, S>(depth, inbound, ctx.clone()));
        Self { outbound, join }
    }

    pub(crate) async fn forward(&mut self, value: u64) -> Result<()> {
        self.outbound.send(value).await
    }

    /// Closes the channel and waits for the successor's whole subtree.
    pub(crate) async fn finish(self) -> Result<ChainStats> {
        self.outbound.close();
        self.join.await
    }

    /// Joins a successor that stopped reading before the stream ended.
    ///
    /// The successor's own failure is the root cause, so it takes precedence
    /// over the `TransportClosed` seen by the sender.
    pub(crate) async fn unwind(self, err: Error) -> Error {
        drop(self.outbound);
        match self.join.await {
            Err(cause) => cause,
            Ok(_) => err,
        }
    }
}

struct Stage<R: Runtime, S> {
    depth: usize,
    base: u64,
    inbound: R::Consumer,
    outbound: Option<Successor<R>>,
    ctx: StageContext<S>,
}

/// Runs one stage to completion, including the join on its successor.
///
/// Boxed because every stage spawns the next one through this same function.
pub(crate) fn run_stage<R: Runtime, S: PrimeSink>(
    depth: usize,
    mut inbound: R::Consumer,
    ctx: StageContext<S>,
) -> BoxFuture<'static, Result<ChainStats>> {
    async move {
        let Some(base) = inbound.receive().await else {
            #[cfg(feature = "tracing")]
            tracing::debug!("Stage {} received an empty stream", depth);
            return Ok(ChainStats::default());
        };

        let reported = ctx.range.reports(base);
        if reported {
            ctx.sink.emit(base)?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(depth, base, reported, "Stage found its base");

        let stage = Stage::<R, S> {
            depth,
            base,
            inbound,
            outbound: None,
            ctx,
        };

        let mut stats = stage.filter().await?;
        stats.stages += 1;
        if reported {
            stats.primes += 1;
        }
        Ok(stats)
    }
    .boxed()
}

impl<R: Runtime, S: PrimeSink> Stage<R, S> {
    async fn filter(mut self) -> Result<ChainStats> {
        while let Some(value) = self.inbound.receive().await {
            if value % self.base == 0 {
                continue;
            }

            let mut successor = self
                .outbound
                .take()
                .unwrap_or_else(|| Successor::spawn(self.depth + 1, &self.ctx));

            if let Err(err) = successor.forward(value).await {
                #[cfg(feature = "tracing")]
                tracing::warn!("Stage {} lost its successor: {}", self.depth, err);

                return Err(successor.unwind(err).await);
            }
            self.outbound = Some(successor);
        }

        match self.outbound {
            Some(successor) => {
                let stats = successor.finish().await?;

                #[cfg(feature = "tracing")]
                tracing::trace!("Stage {} joined its successor", self.depth);

                Ok(stats)
            }
            None => Ok(ChainStats::default()),
        }
    }
}
