//! Diagnostics for the `primes` binary.
//!
//! Logs are written to stderr so that stdout carries nothing but `prime <N>`
//! lines. Filtering follows `RUST_LOG` and defaults to `warn`.
//!
//! If compiled **without** the `tracing` feature, [`init_tracing`] is a no-op.

/// Installs the global `tracing-subscriber` formatter, if enabled.
///
/// The subscriber is configured with:
/// - Environment-based level filtering (via `RUST_LOG`)
/// - Thread IDs, file and line metadata
/// - Local RFC 3339 timestamps
pub fn init_tracing() {
    #[cfg(feature = "tracing")]
    {
        use tracing_subscriber::fmt::format::FmtSpan;
        use tracing_subscriber::{EnvFilter, fmt};

        fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(fmt::time::ChronoLocal::rfc_3339())
            .init();
    }
}
