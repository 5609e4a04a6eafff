use tracing::{debug, info};

use super::{now, SessionFlowService};
use crate::channel::{Record, RecordPath, WriteBatch};
use crate::domain::{
    assign_roles, deal_inventory, next_phase, Assignment, Participant, PhaseOperation, Role,
    RoundOutcome,
};
use crate::error::SessionError;
use crate::session::{SessionContext, SessionView};

/// What `start_round` and `reroll` committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundStart {
    pub round: u32,
    pub assignment: Assignment,
}

impl SessionFlowService {
    /// Start a run: deal every participant a fresh inventory, empty their
    /// graves, reset the round counter and move to `rolling`.
    pub async fn start_run(&self, ctx: &SessionContext) -> Result<(), SessionError> {
        let view = ctx.view();
        let mut state = view.session_state()?;
        Self::require_owner(ctx, &view, PhaseOperation::StartRun)?;
        let next = next_phase(state.phase, PhaseOperation::StartRun)?;

        let participants = view.participants()?;
        let pool = &self.config().resource_pool;
        let count = self.config().alive_per_run;
        let dealt = self.with_rng(|rng| -> Result<Vec<Participant>, SessionError> {
            let mut dealt = Vec::with_capacity(participants.len());
            for mut p in participants {
                p.alive_resources = deal_inventory(pool, count, &mut *rng)?;
                p.grave_resources.clear();
                dealt.push(p);
            }
            Ok(dealt)
        })?;

        let now = now();
        state.phase = next;
        state.round = 0;
        state.outcome = None;
        state.touch(now);

        let mut batch = WriteBatch::new();
        for p in dealt {
            batch.put_participant(ctx.session_id(), p);
        }
        batch.put_session(ctx.session_id(), state);
        ctx.channel().atomic_write(batch).await?;

        info!(session_id = %ctx.session_id(), alive_per_run = count, "Run started");
        debug!(session_id = %ctx.session_id(), "Transition: idle -> rolling");
        Ok(())
    }

    /// Begin the next round: clear last round's roles and lock-ins, bump the
    /// round, assign fresh roles and move to `locked`, all in one batch.
    pub async fn start_round(&self, ctx: &SessionContext) -> Result<RoundStart, SessionError> {
        let view = ctx.view();
        let mut state = view.session_state()?;
        Self::require_owner(ctx, &view, PhaseOperation::StartRound)?;
        let next = next_phase(state.phase, PhaseOperation::StartRound)?;

        let round = state.round + 1;
        let assignment = self.assign(ctx)?;

        state.phase = next;
        state.round = round;
        state.outcome = None;
        state.touch(now());

        let mut batch = self.assignment_batch(ctx, &view, &assignment)?;
        batch.put_session(ctx.session_id(), state);
        ctx.channel().atomic_write(batch).await?;

        info!(
            session_id = %ctx.session_id(),
            round,
            participants = assignment.len(),
            "Round started"
        );
        Ok(RoundStart { round, assignment })
    }

    /// Re-roll the current round's roles without advancing the round.
    pub async fn reroll(&self, ctx: &SessionContext) -> Result<RoundStart, SessionError> {
        let view = ctx.view();
        let mut state = view.session_state()?;
        Self::require_owner(ctx, &view, PhaseOperation::Reroll)?;
        next_phase(state.phase, PhaseOperation::Reroll)?;
        if state.round == 0 {
            return Err(SessionError::invalid_phase("no round to re-roll yet"));
        }

        let assignment = self.assign(ctx)?;
        state.touch(now());

        let mut batch = self.assignment_batch(ctx, &view, &assignment)?;
        batch.put_session(ctx.session_id(), state.clone());
        ctx.channel().atomic_write(batch).await?;

        info!(session_id = %ctx.session_id(), round = state.round, "Roles re-rolled");
        Ok(RoundStart {
            round: state.round,
            assignment,
        })
    }

    /// Record the round's outcome and bump the matching run and cumulative
    /// counters.
    pub async fn end_round(
        &self,
        ctx: &SessionContext,
        outcome: RoundOutcome,
    ) -> Result<(), SessionError> {
        let view = ctx.view();
        let mut state = view.session_state()?;
        let mut stats = view.run_stats()?;
        Self::require_owner(ctx, &view, PhaseOperation::EndRound)?;
        let next = next_phase(state.phase, PhaseOperation::EndRound)?;

        stats.record(outcome);
        state.phase = next;
        state.outcome = Some(outcome);
        state.touch(now());

        let mut batch = WriteBatch::new();
        batch.put_session(ctx.session_id(), state.clone());
        batch.put_stats(ctx.session_id(), stats.clone());
        ctx.channel().atomic_write(batch).await?;

        info!(
            session_id = %ctx.session_id(),
            round = state.round,
            outcome = %outcome,
            wins = stats.wins,
            losses = stats.losses,
            "Round ended"
        );
        Ok(())
    }

    /// Confirm the caller's own assignment. Open to every participant.
    pub async fn lock_in(&self, ctx: &SessionContext) -> Result<(), SessionError> {
        let view = ctx.view();
        let state = view.session_state()?;
        let mut me = view.me()?;
        next_phase(state.phase, PhaseOperation::LockIn)?;

        me.locked_in = true;
        let path = RecordPath::Participant(ctx.session_id().clone(), me.id.clone());
        ctx.channel()
            .single_write(path, Record::Participant(me))
            .await?;

        debug!(
            session_id = %ctx.session_id(),
            participant_id = %ctx.caller().participant_id,
            round = state.round,
            "Locked in"
        );
        Ok(())
    }

    fn assign(&self, ctx: &SessionContext) -> Result<Assignment, SessionError> {
        let roster = ctx.roster();
        Ok(self.with_rng(|rng| assign_roles(&roster, &Role::ALL, rng))?)
    }

    /// Participant writes for a fresh assignment, previous roles cleared.
    fn assignment_batch(
        &self,
        ctx: &SessionContext,
        view: &SessionView<'_>,
        assignment: &Assignment,
    ) -> Result<WriteBatch, SessionError> {
        let mut batch = WriteBatch::new();
        for mut p in view.participants()? {
            p.clear_roles();
            if let Some(roles) = assignment.get(&p.id) {
                p.main_role = Some(roles.main);
                p.secondary_role = roles.secondary;
            }
            batch.put_participant(ctx.session_id(), p);
        }
        Ok(batch)
    }
}
