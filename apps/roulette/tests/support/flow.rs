//! Drive a session to a given phase.

use roulette::domain::{Participant, RoundOutcome, SummarySubmission};
use roulette::{RunCheck, SessionContext, SessionError, SessionFlowService};

/// `start_run` then `start_round`: phase `locked`, round 1.
pub async fn to_locked(flow: &SessionFlowService, owner: &SessionContext) {
    flow.start_run(owner).await.expect("start run");
    flow.start_round(owner).await.expect("start round");
}

/// Through `end_round(outcome)`: phase `summary`.
pub async fn to_summary(flow: &SessionFlowService, owner: &SessionContext, outcome: RoundOutcome) {
    to_locked(flow, owner).await;
    flow.end_round(owner, outcome).await.expect("end round");
}

/// A valid summary for `participant` matching `outcome`, playing the first
/// alive resource on a loss.
pub fn summary_for(participant: &Participant, outcome: RoundOutcome) -> SummarySubmission {
    let lane = participant
        .main_role
        .expect("participant has a main role this round");
    match outcome {
        RoundOutcome::Win => SummarySubmission::win(lane),
        RoundOutcome::Loss => {
            let played = participant
                .alive_resources
                .iter()
                .next()
                .cloned()
                .expect("participant has an alive resource");
            SummarySubmission::loss(lane, played)
        }
    }
}

/// Every roster member reports `outcome`; returns the last run check.
pub async fn submit_all(
    flow: &SessionFlowService,
    ctx: &SessionContext,
    outcome: RoundOutcome,
) -> Result<RunCheck, SessionError> {
    let mut check = RunCheck::NotReady;
    for p in ctx.participants()? {
        check = flow
            .submit_summary(ctx, &p.id, summary_for(&p, outcome))
            .await?;
    }
    Ok(check)
}
