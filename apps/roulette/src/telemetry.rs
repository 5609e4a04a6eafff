use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// JSON logs to stdout, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    init_tracing_with_default("info");
}

/// Same as [`init_tracing`] with a caller-chosen fallback filter. Only the
/// first call installs a subscriber.
pub fn init_tracing_with_default(default_filter: &str) {
    INSTALLED.get_or_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_ansi(false)
            .json();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .ok();
    });
}
