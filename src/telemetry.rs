// src/telemetry.rs
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,tabload=debug";

/// Install the global fmt subscriber. `RUST_LOG` overrides the default filter.
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .try_init();
}

/// Subscriber for tests: output goes through the test harness capture.
#[cfg(test)]
pub(crate) fn init_test() {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tabload=trace")),
        )
        .with_test_writer()
        .finish();
    // ignore "already set" when several tests share the process
    let _ = tracing::subscriber::set_global_default(subscriber);
}
