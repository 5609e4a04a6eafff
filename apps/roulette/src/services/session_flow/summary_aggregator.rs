use tracing::{debug, info, warn};

use super::{now, RunCheck, SessionFlowService};
use crate::channel::WriteBatch;
use crate::domain::{
    apply_summary, check_played_resource, next_phase, ParticipantId, PhaseOperation,
    SummarySubmission,
};
use crate::error::SessionError;
use crate::session::SessionContext;

impl SessionFlowService {
    /// Record `participant_id`'s report for the current round.
    ///
    /// The summary, the inventory change it implies and the participant's
    /// lifetime stats land in one write. Once it commits the elimination
    /// check runs and its result is returned. A failing check does not undo
    /// the committed summary; it comes back as [`RunCheck::CheckFailed`] and
    /// `check_run_over` can be called again.
    pub async fn submit_summary(
        &self,
        ctx: &SessionContext,
        participant_id: &ParticipantId,
        submission: SummarySubmission,
    ) -> Result<RunCheck, SessionError> {
        let view = ctx.view();
        let state = view.session_state()?;
        let mut participant = view.participant(participant_id)?;
        next_phase(state.phase, PhaseOperation::SubmitSummary)?;

        let summary = submission.into_summary(state.round, now())?;
        check_played_resource(&participant, &summary)?;
        let outcome = summary.outcome;
        let resubmission = participant.submitted_round == Some(state.round);
        apply_summary(&mut participant, summary);

        let alive = participant.alive_resources.len();
        let mut batch = WriteBatch::new();
        batch.put_participant(ctx.session_id(), participant);
        ctx.channel().atomic_write(batch).await?;

        info!(
            session_id = %ctx.session_id(),
            participant_id = %participant_id,
            round = state.round,
            outcome = %outcome,
            alive,
            resubmission,
            "Summary submitted"
        );

        let check = match self.check_run_over(ctx).await {
            Ok(check) => check,
            Err(error) => {
                warn!(
                    session_id = %ctx.session_id(),
                    participant_id = %participant_id,
                    round = state.round,
                    code = %error.code(),
                    "Summary committed but the run check failed: {error}"
                );
                RunCheck::CheckFailed { error }
            }
        };
        debug!(session_id = %ctx.session_id(), check = ?check, "Run check after summary");
        Ok(check)
    }
}
