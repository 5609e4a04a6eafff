//! Session flow service - drives the phase machine, records summaries and
//! resets runs, reading from a [`SessionContext`] and writing through its
//! shared state channel.
//!
//! Operations are split by concern:
//! - `phase_controller`: owner-driven transitions and lock-in
//! - `summary_aggregator`: per-participant round reports
//! - `run_lifecycle`: elimination check and the reset cascade

mod phase_controller;
mod run_lifecycle;
mod summary_aggregator;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use time::OffsetDateTime;
use tracing::warn;

use crate::config::SessionConfig;
use crate::domain::{ParticipantId, PhaseOperation};
use crate::error::SessionError;
use crate::session::{SessionContext, SessionView};

pub use phase_controller::RoundStart;
pub use run_lifecycle::RunCheck;

/// Stateless apart from configuration and its RNG; one instance can serve
/// any number of sessions.
pub struct SessionFlowService {
    config: SessionConfig,
    /// `&self` methods need mutable RNG access.
    rng: Mutex<ChaCha8Rng>,
}

impl SessionFlowService {
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Ok(Self {
            config,
            rng: Mutex::new(rng),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> T {
        let mut rng = self.rng.lock();
        f(&mut rng)
    }

    /// Reject unless the caller is the participant stored as owner.
    fn require_owner(
        ctx: &SessionContext,
        view: &SessionView<'_>,
        op: PhaseOperation,
    ) -> Result<(), SessionError> {
        let caller = &ctx.caller().participant_id;
        let participants = view.participants()?;
        let owner: Option<&ParticipantId> = participants
            .iter()
            .find(|p| p.is_owner())
            .map(|p| &p.id);

        match owner {
            Some(owner) if owner == caller => Ok(()),
            Some(owner) => {
                warn!(
                    session_id = %ctx.session_id(),
                    participant_id = %caller,
                    owner = %owner,
                    operation = %op,
                    "Rejected owner-only operation"
                );
                Err(SessionError::not_owner(format!(
                    "only the owner may {op}, {caller} is not the owner"
                )))
            }
            None => Err(SessionError::missing(format!(
                "session {} has no owner on the roster",
                ctx.session_id()
            ))),
        }
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}
