//! Round summary validation and its effect on a participant record.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::records::{Participant, ResourceId, RoundSummary};
use crate::domain::roles::{Role, RoundOutcome};
use crate::errors::domain::{DomainError, ValidationKind};

/// Caller-supplied summary before the round and timestamp are attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySubmission {
    pub outcome: RoundOutcome,
    pub reported_lane: Option<Role>,
    pub kill_participation: bool,
    pub gained_resource: Option<ResourceId>,
    pub played_resource: Option<ResourceId>,
}

impl SummarySubmission {
    pub fn win(lane: Role) -> Self {
        Self {
            outcome: RoundOutcome::Win,
            reported_lane: Some(lane),
            kill_participation: false,
            gained_resource: None,
            played_resource: None,
        }
    }

    pub fn loss(lane: Role, played: ResourceId) -> Self {
        Self {
            outcome: RoundOutcome::Loss,
            reported_lane: Some(lane),
            kill_participation: false,
            gained_resource: None,
            played_resource: Some(played),
        }
    }

    /// Mark kill participation and the resource earned from it.
    pub fn with_gain(mut self, gained: ResourceId) -> Self {
        self.kill_participation = true;
        self.gained_resource = Some(gained);
        self
    }

    /// Check the submission and stamp it with `round` and `now`.
    pub fn into_summary(self, round: u32, now: OffsetDateTime) -> Result<RoundSummary, DomainError> {
        let reported_lane = self
            .reported_lane
            .ok_or_else(|| malformed("Summary must name the lane actually played"))?;

        let played_resource = normalize(self.played_resource);
        let gained_resource = normalize(self.gained_resource);

        match (self.outcome, &played_resource) {
            (RoundOutcome::Loss, None) => {
                return Err(malformed("A LOSS summary must name the played resource"));
            }
            (RoundOutcome::Win, Some(_)) => {
                return Err(malformed("A WIN summary must not name a played resource"));
            }
            _ => {}
        }

        if gained_resource.is_some() && !self.kill_participation {
            return Err(malformed(
                "A gained resource requires kill participation",
            ));
        }

        Ok(RoundSummary {
            round,
            outcome: self.outcome,
            reported_lane,
            kill_participation: self.kill_participation,
            gained_resource,
            played_resource,
            submitted_at: now,
        })
    }
}

fn normalize(resource: Option<ResourceId>) -> Option<ResourceId> {
    resource.and_then(|r| ResourceId::parse(r.as_str()))
}

fn malformed(detail: &str) -> DomainError {
    DomainError::validation(ValidationKind::MalformedSummary, detail)
}

/// A LOSS may only play a resource the participant still holds alive. The
/// one exception is re-reporting the same round with the resource that round
/// already buried.
pub fn check_played_resource(
    participant: &Participant,
    summary: &RoundSummary,
) -> Result<(), DomainError> {
    let (RoundOutcome::Loss, Some(played)) = (summary.outcome, &summary.played_resource) else {
        return Ok(());
    };
    if participant.alive_resources.contains(played) {
        return Ok(());
    }
    let buried_this_round = participant.submitted_round == Some(summary.round)
        && participant
            .last_summary
            .as_ref()
            .and_then(|s| s.played_resource.as_ref())
            == Some(played);
    if buried_this_round {
        return Ok(());
    }
    Err(DomainError::validation(
        ValidationKind::MalformedSummary,
        format!("Played resource {played} is not alive for {}", participant.id),
    ))
}

/// Apply a validated summary to `participant`.
///
/// Lifetime stats are only bumped the first time a round is reported;
/// inventory effects apply on every call.
pub fn apply_summary(participant: &mut Participant, summary: RoundSummary) {
    let first_report = participant.submitted_round != Some(summary.round);

    if let (RoundOutcome::Loss, Some(played)) = (summary.outcome, &summary.played_resource) {
        participant.bury(played);
    }
    if summary.kill_participation {
        if let Some(gained) = &summary.gained_resource {
            participant.gain(gained);
        }
    }

    if first_report {
        let stats = &mut participant.stats;
        stats.rounds_played += 1;
        match summary.outcome {
            RoundOutcome::Win => stats.wins += 1,
            RoundOutcome::Loss => stats.losses += 1,
        }
        *stats.lane_counts.entry(summary.reported_lane).or_insert(0) += 1;
        if let Some(played) = &summary.played_resource {
            *stats.resource_plays.entry(played.clone()).or_insert(0) += 1;
        }
    }

    participant.submitted_round = Some(summary.round);
    participant.last_summary = Some(summary);
}
