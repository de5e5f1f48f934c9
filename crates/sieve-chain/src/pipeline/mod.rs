
use crate::{
    CandidateRange, DEFAULT_CAPACITY, Error, PrimeSink, Result, Runtime,
    stage::{StageContext, Successor},
};
use std::sync::Arc;

/// Settings for one sieve run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Primes in this range are reported.
    pub range: CandidateRange,
    /// Buffer size of every inter-stage channel.
    pub capacity: usize,
}

impl PipelineConfig {
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    pub fn new(range: CandidateRange, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self { range, capacity })
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            range: CandidateRange::default(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// What a finished run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Values the driver fed into the first stage.
    pub candidates: u64,
    /// Stages that found a base. Equals the number of primes up to `high`
    /// when the range is non-empty, and zero otherwise.
    pub stages: usize,
    /// Primes handed to the sink.
    pub primes: usize,
}

/// Seeds the stage chain and owns its lifetime.
///
/// The driver spawns the head stage, streams every candidate into it, closes
/// the channel and then waits until the last stage in the chain has exited.
pub struct Pipeline<S> {
    config: PipelineConfig,
    sink: Arc<S>,
}

impl<S: PrimeSink> Pipeline<S> {
    pub fn new(config: PipelineConfig, sink: Arc<S>) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    /// Runs the sieve on runtime `R` and returns once every stage has joined.
    ///
    /// # Errors
    ///
    /// Any stage failure is fatal and surfaces here: [`Error::Sink`] if the
    /// sink rejects a prime, [`Error::StageJoin`] if a stage task panics, or
    /// [`Error::TransportClosed`] if a stage dropped its inbound early without
    /// a more specific cause.
    pub async fn run<R: Runtime>(&self) -> Result<Summary> {
        let ctx = StageContext {
            sink: Arc::clone(&self.sink),
            range: self.config.range,
            capacity: self.config.capacity,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            low = self.config.range.low(),
            high = self.config.range.high(),
            capacity = self.config.capacity,
            "Starting sieve"
        );

        let mut head = Successor::<R>::spawn(0, &ctx);
        let mut candidates = 0;

        for value in self.config.range.seed() {
            if let Err(err) = head.forward(value).await {
                return Err(head.unwind(err).await);
            }
            candidates += 1;
        }

        let stats = head.finish().await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            candidates,
            stages = stats.stages,
            primes = stats.primes,
            "Sieve finished"
        );

        Ok(Summary {
            candidates,
            stages: stats.stages,
            primes: stats.primes,
        })
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        let err = PipelineConfig::new(CandidateRange::default(), 0).unwrap_err();
        assert!(matches!(err, Error::InvalidCapacity(0)));
    }

    #[test]
    fn empty_range_is_not_rejected() {
        let range = CandidateRange::new(20, 10).unwrap();
        assert!(range.is_empty());
        assert!(PipelineConfig::new(range, 1).is_ok());
    }

    #[test]
    fn default_matches_reference_run() {
        let config = PipelineConfig::default();
        assert_eq!(config.range, CandidateRange::up_to(35));
        assert_eq!(config.capacity, 1);
    }
}
