//! Persisted record shapes: one `SessionState` and one `RunStats` per
//! session, one `Participant` per member.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::phase::Phase;
use crate::domain::roles::{Role, RoundOutcome};

/// Opaque session identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id for sessions created locally.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque participant identity, as handed out by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inventory item identifier (a champion name in practice).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Build a resource id, trimming surrounding whitespace.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_string())
    }

    /// Like [`ResourceId::new`] but treats a blank id as absent.
    pub fn parse(id: &str) -> Option<Self> {
        let trimmed = id.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Owner,
    Member,
}

/// Session-wide phase and round counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub phase: Phase,
    /// Only decreases when a run is reset, and then only to 0.
    pub round: u32,
    /// Meaningful only while `phase == Summary`.
    pub outcome: Option<RoundOutcome>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub last_action_at: Option<OffsetDateTime>,
}

impl SessionState {
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            phase: Phase::Idle,
            round: 0,
            outcome: None,
            updated_at: now,
            last_action_at: None,
        }
    }

    /// Record a mutation at `now`.
    pub fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
        self.last_action_at = Some(now);
    }
}

/// Win/loss counters for the current run and across all runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub wins: u32,
    pub losses: u32,
    pub cumulative_wins: u32,
    pub cumulative_losses: u32,
    pub run_counter: u32,
}

impl RunStats {
    pub fn record(&mut self, outcome: RoundOutcome) {
        match outcome {
            RoundOutcome::Win => {
                self.wins += 1;
                self.cumulative_wins += 1;
            }
            RoundOutcome::Loss => {
                self.losses += 1;
                self.cumulative_losses += 1;
            }
        }
    }
}

/// A participant's report for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub round: u32,
    pub outcome: RoundOutcome,
    /// Lane the participant says they actually played.
    pub reported_lane: Role,
    pub kill_participation: bool,
    /// Only present when `kill_participation` is set.
    pub gained_resource: Option<ResourceId>,
    /// Present iff `outcome == Loss`.
    pub played_resource: Option<ResourceId>,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

/// Lifetime counters per participant; untouched by run resets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStats {
    pub rounds_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub lane_counts: BTreeMap<Role, u32>,
    pub resource_plays: BTreeMap<ResourceId, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: Option<String>,
    pub membership_role: MembershipRole,
    pub main_role: Option<Role>,
    pub secondary_role: Option<Role>,
    /// Always disjoint from `grave_resources`.
    pub alive_resources: BTreeSet<ResourceId>,
    pub grave_resources: BTreeSet<ResourceId>,
    pub locked_in: bool,
    pub submitted_round: Option<u32>,
    pub last_summary: Option<RoundSummary>,
    #[serde(default)]
    pub stats: ParticipantStats,
}

impl Participant {
    pub fn new(id: ParticipantId, membership_role: MembershipRole) -> Self {
        Self {
            id,
            display_name: None,
            membership_role,
            main_role: None,
            secondary_role: None,
            alive_resources: BTreeSet::new(),
            grave_resources: BTreeSet::new(),
            locked_in: false,
            submitted_round: None,
            last_summary: None,
            stats: ParticipantStats::default(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn is_owner(&self) -> bool {
        self.membership_role == MembershipRole::Owner
    }

    pub fn is_eliminated(&self) -> bool {
        self.alive_resources.is_empty()
    }

    pub fn clear_roles(&mut self) {
        self.main_role = None;
        self.secondary_role = None;
        self.locked_in = false;
    }

    /// Wipe every run-scoped field; lifetime stats survive.
    pub fn reset_for_new_run(&mut self) {
        self.clear_roles();
        self.alive_resources.clear();
        self.grave_resources.clear();
        self.last_summary = None;
        self.submitted_round = None;
    }
}
