use crate::{Consumer, Error, Pipeline, PrimeSink, Producer, Result, Runtime, Summary};
use futures::FutureExt;
use pin_project_lite::pin_project;
use smol::{
    Task,
    channel::{Receiver, Sender, bounded},
};
use std::{
    any::Any,
    future::Future,
    panic::AssertUnwindSafe,
    pin::Pin,
    task::{Context, Poll},
};

/// A [`Runtime`] backed by Smol's bounded channels and global executor.
///
/// Stages run on `smol`'s global executor, so the driver can be awaited from
/// `smol::block_on` or any other executor.
pub struct SmolRuntime;

impl Runtime for SmolRuntime {
    type Producer = SmolProducer;
    type Consumer = SmolConsumer;
    type JoinHandle<T: Send + 'static> = SmolJoin<T>;

    fn open(capacity: usize) -> (Self::Producer, Self::Consumer) {
        let (tx, rx) = bounded(capacity);
        (SmolProducer { tx }, SmolConsumer { rx })
    }

    fn spawn<F, T>(fut: F) -> Self::JoinHandle<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        // Smol re-raises a task's panic in whoever awaits it.
        SmolJoin {
            task: smol::spawn(AssertUnwindSafe(fut).catch_unwind()),
        }
    }
}

/// Sending half of a Smol stage channel.
#[derive(Debug)]
pub struct SmolProducer {
    tx: Sender<u64>,
}

impl Producer for SmolProducer {
    fn send(&mut self, value: u64) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.tx
                .send(value)
                .await
                .map_err(|_| Error::TransportClosed)
        }
    }

    fn close(self) {
        self.tx.close();
    }
}

/// Receiving half of a Smol stage channel.
///
/// A closed, drained `async-channel` keeps returning an error on every
/// `recv`, which maps directly onto a sticky `None`.
#[derive(Debug)]
pub struct SmolConsumer {
    rx: Receiver<u64>,
}

impl Consumer for SmolConsumer {
    fn receive(&mut self) -> impl Future<Output = Option<u64>> + Send {
        async move { self.rx.recv().await.ok() }
    }
}

pin_project! {
    /// Join handle returned by [`SmolRuntime::spawn`].
    ///
    /// Converts a panicked stage into [`Error::StageJoin`].
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct SmolJoin<T> {
        #[pin]
        task: Task<std::thread::Result<Result<T>>>,
    }
}

impl<T> Future for SmolJoin<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().task.poll(cx) {
            Poll::Ready(Ok(res)) => Poll::Ready(res),
            Poll::Ready(Err(payload)) => Poll::Ready(Err(Error::StageJoin {
                context: panic_message(payload.as_ref()),
            })),
            Poll::Pending => Poll::Pending,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("stage panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("stage panicked: {msg}")
    } else {
        String::from("stage panicked")
    }
}

/// Extension trait for running a [`Pipeline`] on
/// [`smol`](https://docs.rs/smol).
pub trait PipelineSmolExt {
    /// Runs the pipeline with [`SmolRuntime`].
    ///
    /// Internally delegates to [`Pipeline::run`].
    ///
    /// # Errors
    ///
    /// Returns whatever [`Pipeline::run`] returns.
    fn run_smol(&self) -> impl Future<Output = Result<Summary>>;
}

impl<S: PrimeSink> PipelineSmolExt for Pipeline<S> {
    fn run_smol(&self) -> impl Future<Output = Result<Summary>> {
        self.run::<SmolRuntime>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests as suite;
    use crate::{CollectSink, PipelineConfig};
    use smol::Timer;
    use std::sync::Arc;
    use std::time::Duration;

    const DEADLINE: Duration = Duration::from_secs(30);

    fn block_on_within_deadline(fut: impl Future<Output = ()>) {
        smol::block_on(smol::future::or(fut, async {
            Timer::after(DEADLINE).await;
            panic!("pipeline did not terminate");
        }));
    }

    #[test]
    fn emits_primes_up_to_ten() {
        block_on_within_deadline(suite::emits_primes_up_to_ten::<SmolRuntime>());
    }

    #[test]
    fn single_candidate_runs_one_stage() {
        block_on_within_deadline(suite::single_candidate_runs_one_stage::<SmolRuntime>());
    }

    #[test]
    fn reference_range_prints_eleven_lines() {
        block_on_within_deadline(suite::reference_range_prints_eleven_lines::<SmolRuntime>());
    }

    #[test]
    fn empty_range_spawns_only_the_head() {
        block_on_within_deadline(suite::empty_range_spawns_only_the_head::<SmolRuntime>());
    }

    #[test]
    fn matches_trial_division() {
        block_on_within_deadline(suite::matches_trial_division::<SmolRuntime>());
    }

    #[test]
    fn deep_chain_with_wide_buffers() {
        block_on_within_deadline(suite::deep_chain_with_wide_buffers::<SmolRuntime>());
    }

    #[test]
    fn sink_failure_unwinds_the_chain() {
        block_on_within_deadline(suite::sink_failure_unwinds_the_chain::<SmolRuntime>());
    }

    #[test]
    fn closed_channel_is_sticky() {
        block_on_within_deadline(suite::closed_channel_is_sticky::<SmolRuntime>());
    }

    #[test]
    fn send_to_dropped_consumer_fails() {
        block_on_within_deadline(suite::send_to_dropped_consumer_fails::<SmolRuntime>());
    }

    #[test]
    fn full_channel_applies_backpressure() {
        block_on_within_deadline(suite::full_channel_applies_backpressure::<SmolRuntime>());
    }

    #[test]
    fn panicking_stage_surfaces_as_join_error() {
        let err = smol::block_on(SmolRuntime::spawn(async {
            let fail = true;
            assert!(!fail, "stage blew up");
            Ok::<(), Error>(())
        }))
        .unwrap_err();

        match err {
            Error::StageJoin { context } => assert!(context.contains("stage blew up")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn extension_trait_runs_on_smol() {
        let sink = Arc::new(CollectSink::default());
        let pipeline = Pipeline::new(PipelineConfig::default(), Arc::clone(&sink));
        let summary = smol::block_on(pipeline.run_smol()).unwrap();
        assert_eq!(summary.stages, 11);
        assert_eq!(sink.primes(), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31]);
    }
}
