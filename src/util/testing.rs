//! Shared test setup.

use std::env;
use std::sync::Once;

use tracing::info;
use tracing_subscriber::{fmt, fmt::format::FmtSpan, prelude::*, EnvFilter};

static TEST_SETUP: Once = Once::new();

/// Default filter when `RUST_LOG` is unset: our own crate at trace, the rest quiet.
const DEFAULT_TEST_FILTER: &str = "warn,corix=trace";

/// Install the test log subscriber once per test binary.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let env_filter = env::var("RUST_LOG")
            .ok()
            .and_then(|spec| EnvFilter::try_new(spec).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_TEST_FILTER));

        let layer = fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter);

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            eprintln!("tracing subscriber already installed");
        }
        info!("Test Setup complete");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_repeated_calls_when_init_test_setup_then_idempotent() {
        init_test_setup();
        init_test_setup();
    }
}
