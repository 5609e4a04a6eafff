//! Shared helpers for the roulette integration tests: one-time logging setup
//! and unique identifiers so concurrently running tests never share a session.

pub mod logging;
pub mod unique;

pub use unique::{unique_participant_ids, unique_str};
