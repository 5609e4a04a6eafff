//! Session-scoped context: who is calling, who is in the session, and the
//! live subscriptions the operations read from.

mod context;

pub use context::{all_submitted, Caller, SessionContext, SessionView};
