use crate::Result;
use core::future::Future;

/// Default number of values a channel buffers before `send` suspends.
///
/// One slot keeps the chain close to a rendezvous handoff while still letting
/// a producer run a single value ahead of its consumer.
pub const DEFAULT_CAPACITY: usize = 1;

/// The sending half of a single-producer / single-consumer channel.
///
/// `close` takes `self`, so a producer can be closed exactly once and never
/// used again afterwards.
pub trait Producer: Send + 'static {
    /// Suspends until `value` is buffered or handed to the consumer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TransportClosed`] if the consumer end has been
    /// dropped.
    fn send(&mut self, value: u64) -> impl Future<Output = Result<()>> + Send;

    /// Signals that no further values will be sent.
    ///
    /// Values already buffered remain readable by the consumer.
    fn close(self);
}

/// The receiving half of a single-producer / single-consumer channel.
pub trait Consumer: Send + 'static {
    /// Suspends until a value arrives or the producer has closed.
    ///
    /// Returns `None` once the producer is closed and the buffer is drained.
    /// From then on every call returns `None` immediately.
    fn receive(&mut self) -> impl Future<Output = Option<u64>> + Send;
}
