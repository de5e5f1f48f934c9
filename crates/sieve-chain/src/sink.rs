use crate::{Error, Result};
use parking_lot::Mutex;
use std::io::{self, Write};

/// Receives every prime the chain discovers.
///
/// A single sink is shared by all stages. Each stage emits its base before it
/// spawns a successor, so a sink observes primes in increasing order.
pub trait PrimeSink: Send + Sync + 'static {
    /// Records one discovered prime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sink`] if the prime could not be recorded. The stage
    /// that discovered it fails, and so does the whole run.
    fn emit(&self, prime: u64) -> Result<()>;
}

/// Writes each prime as a `prime <N>` line.
///
/// This is the output format of the classic `primes` utility.
#[derive(Debug)]
pub struct LineSink<W> {
    out: Mutex<W>,
}

impl<W: Write + Send + 'static> LineSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Flushes the underlying writer.
    ///
    /// # Errors
    ///
    /// Propagates the writer's I/O error.
    pub fn flush(&self) -> io::Result<()> {
        self.out.lock().flush()
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl LineSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> PrimeSink for LineSink<W> {
    fn emit(&self, prime: u64) -> Result<()> {
        writeln!(self.out.lock(), "prime {prime}").map_err(|source| Error::Sink { prime, source })
    }
}

/// Keeps discovered primes in memory, in discovery order.
#[derive(Debug, Default)]
pub struct CollectSink {
    primes: Mutex<Vec<u64>>,
}

impl CollectSink {
    /// Snapshot of the primes recorded so far.
    pub fn primes(&self) -> Vec<u64> {
        self.primes.lock().clone()
    }
}

impl PrimeSink for CollectSink {
    fn emit(&self, prime: u64) -> Result<()> {
        self.primes.lock().push(prime);
        Ok(())
    }
}
