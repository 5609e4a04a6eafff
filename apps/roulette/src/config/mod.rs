//! Configuration for the session core.

pub mod resource_pool;
pub mod session;

pub use session::SessionConfig;
