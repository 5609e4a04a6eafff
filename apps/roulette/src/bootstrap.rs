//! Initial records for a new session.
//!
//! Session creation is owned by an outside collaborator; this writes the same
//! records it would so tests and the simulator can start from `idle`.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::info;

use crate::channel::{SharedStateChannel, WriteBatch};
use crate::domain::{
    MembershipRole, Participant, ParticipantId, RunStats, SessionId, SessionState, ROLE_COUNT,
};
use crate::error::SessionError;
use crate::session::{Caller, SessionContext};

/// A session id plus its roster. The first member is the owner.
#[derive(Debug, Clone)]
pub struct SessionSeed {
    session_id: SessionId,
    members: Vec<(ParticipantId, Option<String>)>,
}

impl SessionSeed {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            members: Vec::new(),
        }
    }

    pub fn member(mut self, id: ParticipantId, display_name: Option<String>) -> Self {
        self.members.push((id, display_name));
        self
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn roster(&self) -> Vec<ParticipantId> {
        self.members.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn owner(&self) -> Option<&ParticipantId> {
        self.members.first().map(|(id, _)| id)
    }

    /// Identity claim for `id` as recorded in this seed.
    pub fn caller(&self, id: &ParticipantId) -> Result<Caller, SessionError> {
        let idx = self
            .members
            .iter()
            .position(|(pid, _)| pid == id)
            .ok_or_else(|| SessionError::missing(format!("{id} is not on the roster")))?;
        let role = if idx == 0 {
            MembershipRole::Owner
        } else {
            MembershipRole::Member
        };
        let mut caller = Caller::new(id.clone(), role);
        if let Some(name) = &self.members[idx].1 {
            caller = caller.with_display_name(name.clone());
        }
        Ok(caller)
    }

    /// Enroll as `id` against the seeded roster.
    pub fn enroll_as(
        &self,
        channel: Arc<dyn SharedStateChannel>,
        id: &ParticipantId,
    ) -> Result<SessionContext, SessionError> {
        let caller = self.caller(id)?;
        SessionContext::enroll(channel, self.session_id.clone(), caller, self.roster())
    }

    pub fn enroll_owner(
        &self,
        channel: Arc<dyn SharedStateChannel>,
    ) -> Result<SessionContext, SessionError> {
        let owner = self
            .owner()
            .cloned()
            .ok_or_else(|| SessionError::missing("seed has no members"))?;
        self.enroll_as(channel, &owner)
    }

    /// Write session state, zeroed stats and every participant in one batch.
    pub async fn write(&self, channel: &dyn SharedStateChannel) -> Result<(), SessionError> {
        let count = self.members.len();
        if count == 0 || count > ROLE_COUNT {
            return Err(SessionError::unsupported_count(count));
        }

        let now = OffsetDateTime::now_utc();
        let mut batch = WriteBatch::new();
        batch.put_session(&self.session_id, SessionState::new(now));
        batch.put_stats(&self.session_id, RunStats::default());
        for (idx, (id, name)) in self.members.iter().enumerate() {
            let role = if idx == 0 {
                MembershipRole::Owner
            } else {
                MembershipRole::Member
            };
            let mut participant = Participant::new(id.clone(), role);
            participant.display_name = name.clone();
            batch.put_participant(&self.session_id, participant);
        }
        channel.atomic_write(batch).await?;

        info!(session_id = %self.session_id, participants = count, "Session seeded");
        Ok(())
    }
}
