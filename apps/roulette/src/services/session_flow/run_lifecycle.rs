use tracing::{debug, info};

use super::{now, SessionFlowService};
use crate::channel::WriteBatch;
use crate::domain::{next_phase, ParticipantId, Phase, PhaseOperation};
use crate::error::SessionError;
use crate::session::{all_submitted, SessionContext};

/// Outcome of the elimination check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunCheck {
    /// Not every participant has reported, or the session is not in a
    /// completed round.
    NotReady,
    /// Everyone reported and nobody ran out of resources.
    Continuing,
    /// The run ended; the session is back to `idle`.
    Reset {
        eliminated: Vec<ParticipantId>,
        run_counter: u32,
    },
    /// The preceding write committed but the check itself failed, usually
    /// because the reset batch was not accepted. Nothing was reset; run the
    /// check again.
    CheckFailed { error: SessionError },
}

impl RunCheck {
    pub fn is_reset(&self) -> bool {
        matches!(self, RunCheck::Reset { .. })
    }
}

impl SessionFlowService {
    /// Reset the run if the round is complete and someone has no alive
    /// resources left. Reads fresh snapshots on every call.
    pub async fn check_run_over(&self, ctx: &SessionContext) -> Result<RunCheck, SessionError> {
        let view = ctx.view();
        let state = view.session_state()?;
        if state.round == 0 || state.phase != Phase::Summary {
            return Ok(RunCheck::NotReady);
        }

        let participants = view.participants()?;
        if !all_submitted(state.round, &participants) {
            return Ok(RunCheck::NotReady);
        }

        let eliminated: Vec<ParticipantId> = participants
            .iter()
            .filter(|p| p.is_eliminated())
            .map(|p| p.id.clone())
            .collect();
        if eliminated.is_empty() {
            debug!(session_id = %ctx.session_id(), round = state.round, "Run continues");
            return Ok(RunCheck::Continuing);
        }

        let run_counter = self.reset_run(ctx).await?;
        info!(
            session_id = %ctx.session_id(),
            round = state.round,
            eliminated = ?eliminated,
            run_counter,
            "Run over"
        );
        Ok(RunCheck::Reset {
            eliminated,
            run_counter,
        })
    }

    /// Return the session to `idle` and wipe every run-scoped field in one
    /// batch. Cumulative and lifetime counters are kept.
    async fn reset_run(&self, ctx: &SessionContext) -> Result<u32, SessionError> {
        let view = ctx.view();
        let mut state = view.session_state()?;
        let mut stats = view.run_stats()?;
        let participants = view.participants()?;

        state.phase = next_phase(state.phase, PhaseOperation::ResetRun)?;
        state.round = 0;
        state.outcome = None;
        state.touch(now());

        stats.wins = 0;
        stats.losses = 0;
        stats.run_counter += 1;
        let run_counter = stats.run_counter;

        let mut batch = WriteBatch::new();
        batch.put_session(ctx.session_id(), state);
        batch.put_stats(ctx.session_id(), stats);
        for mut p in participants {
            p.reset_for_new_run();
            batch.put_participant(ctx.session_id(), p);
        }
        ctx.channel().atomic_write(batch).await?;

        debug!(session_id = %ctx.session_id(), phase = %Phase::Idle, run_counter, "Run reset");
        Ok(run_counter)
    }
}
