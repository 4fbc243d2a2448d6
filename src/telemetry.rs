//! Tracing setup helpers.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! host's decision. `init_default_tracing` is a convenience for binaries and
//! quick experiments that want pipeline diagnostics on stderr without wiring
//! up a subscriber themselves.

/// Installs a compact stderr subscriber honoring `RUST_LOG`.
///
/// Without a `RUST_LOG` filter, falls back to `chart_race_rs=debug` so the
/// preparation pipeline's own diagnostics are visible. Returns `false` when
/// the `telemetry` feature is off or a global subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chart_race_rs=debug"));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
