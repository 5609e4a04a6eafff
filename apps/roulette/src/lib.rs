#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod bootstrap;
pub mod channel;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod services;
pub mod session;
pub mod telemetry;

// Re-exports for public API
pub use bootstrap::SessionSeed;
pub use channel::{
    ChannelError, InMemoryChannel, Record, RecordPath, SharedStateChannel, Subscription,
    WriteBatch,
};
pub use config::SessionConfig;
pub use error::SessionError;
pub use errors::ErrorCode;
pub use services::session_flow::{RoundStart, RunCheck, SessionFlowService};
pub use session::{Caller, SessionContext, SessionView};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    roulette_test_support::logging::init();
}
