//! Test logging shared by the unit tests (through the `ctor` hook in the
//! `roulette` lib) and every integration test binary.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install the test subscriber once per binary.
///
/// The filter is read from `TEST_LOG`, falling back to `RUST_LOG` and then
/// `warn`. Output goes through the test writer so cargo can capture it, and
/// timestamps are left out to keep output stable.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
