use std::sync::Arc;

use tracing::{debug, info};

use crate::channel::{ChannelError, RecordPath, SharedStateChannel, StoreSnapshot, Subscription};
use crate::domain::{
    MembershipRole, Participant, ParticipantId, Phase, RoundOutcome, RunStats, SessionId,
    SessionState, ROLE_COUNT,
};
use crate::error::SessionError;

/// Identity claimed by the local caller. Trusted as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub participant_id: ParticipantId,
    pub membership_role: MembershipRole,
    pub display_name: Option<String>,
}

impl Caller {
    pub fn new(participant_id: ParticipantId, membership_role: MembershipRole) -> Self {
        Self {
            participant_id,
            membership_role,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// True when every participant has reported for `round`.
pub fn all_submitted(round: u32, participants: &[Participant]) -> bool {
    participants
        .iter()
        .all(|p| p.submitted_round == Some(round))
}

/// Created on enrollment, dropped on leave. Every session operation takes
/// one of these explicitly.
pub struct SessionContext {
    channel: Arc<dyn SharedStateChannel>,
    session_id: SessionId,
    caller: Caller,
    session: Subscription,
    stats: Subscription,
    /// Roster order.
    participants: Vec<(ParticipantId, Subscription)>,
}

impl SessionContext {
    /// Subscribe to the session, its stats and every roster participant.
    pub fn enroll(
        channel: Arc<dyn SharedStateChannel>,
        session_id: SessionId,
        caller: Caller,
        roster: Vec<ParticipantId>,
    ) -> Result<Self, SessionError> {
        check_roster_size(&roster)?;

        let session = channel.subscribe(&RecordPath::Session(session_id.clone()));
        let stats = channel.subscribe(&RecordPath::Stats(session_id.clone()));
        let participants = subscribe_roster(channel.as_ref(), &session_id, roster);

        info!(
            session_id = %session_id,
            participant_id = %caller.participant_id,
            roster = participants.len(),
            "Enrolled in session"
        );

        Ok(Self {
            channel,
            session_id,
            caller,
            session,
            stats,
            participants,
        })
    }

    /// Replace the roster, keeping subscriptions for members that stay.
    pub fn update_roster(&mut self, roster: Vec<ParticipantId>) -> Result<(), SessionError> {
        check_roster_size(&roster)?;

        let mut previous = std::mem::take(&mut self.participants);
        for id in roster {
            let sub = match previous.iter().position(|(pid, _)| *pid == id) {
                Some(idx) => previous.swap_remove(idx).1,
                None => self
                    .channel
                    .subscribe(&RecordPath::Participant(self.session_id.clone(), id.clone())),
            };
            self.participants.push((id, sub));
        }

        debug!(
            session_id = %self.session_id,
            roster = self.participants.len(),
            dropped = previous.len(),
            "Roster updated"
        );
        Ok(())
    }

    /// Tear down every subscription.
    pub fn leave(self) {
        info!(
            session_id = %self.session_id,
            participant_id = %self.caller.participant_id,
            "Left session"
        );
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    pub fn roster(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|(id, _)| id.clone()).collect()
    }

    pub(crate) fn channel(&self) -> &dyn SharedStateChannel {
        self.channel.as_ref()
    }

    /// Pin the latest store snapshot. Everything read through the view
    /// comes from the same set of committed batches.
    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            ctx: self,
            snapshot: self.session.snapshot(),
        }
    }

    pub fn session_state(&self) -> Result<SessionState, SessionError> {
        self.view().session_state()
    }

    pub fn run_stats(&self) -> Result<RunStats, SessionError> {
        self.view().run_stats()
    }

    pub fn participant(&self, id: &ParticipantId) -> Result<Participant, SessionError> {
        self.view().participant(id)
    }

    /// Every roster participant, in roster order.
    pub fn participants(&self) -> Result<Vec<Participant>, SessionError> {
        self.view().participants()
    }

    /// The caller's own participant record.
    pub fn me(&self) -> Result<Participant, SessionError> {
        self.view().me()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.session_state().ok().map(|s| s.phase)
    }

    pub fn round(&self) -> Option<u32> {
        self.session_state().ok().map(|s| s.round)
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.view().outcome()
    }

    /// Whether every roster participant has reported for the current round.
    /// False while any record is missing.
    pub fn all_submitted(&self) -> bool {
        self.view().all_submitted()
    }

    /// Non-empty subscription error slots.
    pub fn errors(&self) -> Vec<(RecordPath, ChannelError)> {
        self.view().errors()
    }
}

/// Consistent read of one session at a single store snapshot.
pub struct SessionView<'a> {
    ctx: &'a SessionContext,
    snapshot: Arc<StoreSnapshot>,
}

impl SessionView<'_> {
    pub fn session_state(&self) -> Result<SessionState, SessionError> {
        let path = self.ctx.session.path();
        let record = self.snapshot.record(path).ok_or_else(|| {
            SessionError::missing(format!("no session state for {}", self.ctx.session_id))
        })?;
        record
            .into_session()
            .ok_or_else(|| corrupt(path, "expected session state"))
    }

    pub fn run_stats(&self) -> Result<RunStats, SessionError> {
        let path = self.ctx.stats.path();
        let record = self.snapshot.record(path).ok_or_else(|| {
            SessionError::missing(format!("no run stats for {}", self.ctx.session_id))
        })?;
        record
            .into_stats()
            .ok_or_else(|| corrupt(path, "expected run stats"))
    }

    pub fn participant(&self, id: &ParticipantId) -> Result<Participant, SessionError> {
        let (_, sub) = self
            .ctx
            .participants
            .iter()
            .find(|(pid, _)| pid == id)
            .ok_or_else(|| SessionError::missing(format!("{id} is not on the roster")))?;
        self.read_participant(sub.path())
    }

    pub fn participants(&self) -> Result<Vec<Participant>, SessionError> {
        self.ctx
            .participants
            .iter()
            .map(|(_, sub)| self.read_participant(sub.path()))
            .collect()
    }

    pub fn me(&self) -> Result<Participant, SessionError> {
        self.participant(&self.ctx.caller.participant_id)
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.session_state()
            .ok()
            .filter(|s| s.phase == Phase::Summary)
            .and_then(|s| s.outcome)
    }

    pub fn all_submitted(&self) -> bool {
        match (self.session_state(), self.participants()) {
            (Ok(state), Ok(participants)) => all_submitted(state.round, &participants),
            _ => false,
        }
    }

    pub fn errors(&self) -> Vec<(RecordPath, ChannelError)> {
        std::iter::once(&self.ctx.session)
            .chain(std::iter::once(&self.ctx.stats))
            .chain(self.ctx.participants.iter().map(|(_, sub)| sub))
            .filter_map(|sub| {
                self.snapshot
                    .error(sub.path())
                    .map(|err| (sub.path().clone(), err))
            })
            .collect()
    }

    fn read_participant(&self, path: &RecordPath) -> Result<Participant, SessionError> {
        let record = self
            .snapshot
            .record(path)
            .ok_or_else(|| SessionError::missing(format!("no participant record at {path}")))?;
        record
            .into_participant()
            .ok_or_else(|| corrupt(path, "expected participant"))
    }
}

fn check_roster_size(roster: &[ParticipantId]) -> Result<(), SessionError> {
    if roster.len() > ROLE_COUNT {
        return Err(SessionError::unsupported_count(roster.len()));
    }
    Ok(())
}

fn subscribe_roster(
    channel: &dyn SharedStateChannel,
    session_id: &SessionId,
    roster: Vec<ParticipantId>,
) -> Vec<(ParticipantId, Subscription)> {
    roster
        .into_iter()
        .map(|id| {
            let sub = channel.subscribe(&RecordPath::Participant(session_id.clone(), id.clone()));
            (id, sub)
        })
        .collect()
}

fn corrupt(path: &RecordPath, detail: &str) -> SessionError {
    ChannelError::Corrupt {
        path: path.to_string(),
        detail: detail.to_string(),
    }
    .into()
}
