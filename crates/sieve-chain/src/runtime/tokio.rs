use crate::{Consumer, Error, Pipeline, PrimeSink, Producer, Result, Runtime, Summary};
use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use pin_project_lite::pin_project;
use tokio::{sync::mpsc, task::JoinHandle};

/// A [`Runtime`] backed by Tokio's bounded `mpsc` channels and
/// `tokio::spawn`.
///
/// Stages are spawned onto the ambient Tokio runtime, so the pipeline must be
/// driven from inside one. A multi-threaded runtime lets stages run in
/// parallel; a current-thread runtime interleaves them cooperatively.
pub struct TokioRuntime;

impl Runtime for TokioRuntime {
    type Producer = TokioProducer;
    type Consumer = TokioConsumer;
    type JoinHandle<T: Send + 'static> = TokioJoin<T>;

    fn open(capacity: usize) -> (Self::Producer, Self::Consumer) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            TokioProducer { tx },
            TokioConsumer {
                rx,
                drained: false,
            },
        )
    }

    fn spawn<F, T>(fut: F) -> Self::JoinHandle<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        TokioJoin {
            handle: tokio::spawn(fut),
        }
    }
}

/// Sending half of a Tokio stage channel.
#[derive(Debug)]
pub struct TokioProducer {
    tx: mpsc::Sender<u64>,
}

impl Producer for TokioProducer {
    fn send(&mut self, value: u64) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.tx
                .send(value)
                .await
                .map_err(|_| Error::TransportClosed)
        }
    }

    fn close(self) {
        drop(self.tx);
    }
}

/// Receiving half of a Tokio stage channel.
#[derive(Debug)]
pub struct TokioConsumer {
    rx: mpsc::Receiver<u64>,
    drained: bool,
}

impl Consumer for TokioConsumer {
    fn receive(&mut self) -> impl Future<Output = Option<u64>> + Send {
        async move {
            if self.drained {
                return None;
            }
            let value = self.rx.recv().await;
            self.drained = value.is_none();
            value
        }
    }
}

pin_project! {
    /// Join handle returned by [`TokioRuntime::spawn`].
    ///
    /// Wraps Tokio's [`JoinHandle`] and flattens a failed join (panic or
    /// abort) into [`Error::StageJoin`].
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct TokioJoin<T> {
        #[pin]
        handle: JoinHandle<Result<T>>,
    }
}

impl<T> Future for TokioJoin<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().handle.poll(cx) {
            Poll::Ready(Ok(res)) => Poll::Ready(res),
            Poll::Ready(Err(e)) => Poll::Ready(Err(Error::StageJoin {
                context: e.to_string(),
            })),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Extension trait for running a [`Pipeline`] on
/// [`tokio`](https://docs.rs/tokio).
///
/// Saves naming the runtime at the call site.
pub trait PipelineTokioExt {
    /// Runs the pipeline with [`TokioRuntime`].
    ///
    /// Internally delegates to [`Pipeline::run`].
    ///
    /// # Errors
    ///
    /// Returns whatever [`Pipeline::run`] returns.
    fn run_tokio(&self) -> impl Future<Output = Result<Summary>>;
}

impl<S: PrimeSink> PipelineTokioExt for Pipeline<S> {
    fn run_tokio(&self) -> impl Future<Output = Result<Summary>> {
        self.run::<TokioRuntime>()
    }
}
