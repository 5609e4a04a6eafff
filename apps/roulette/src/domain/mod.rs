//! Domain layer: pure session logic types and helpers.

pub mod inventory;
pub mod phase;
pub mod records;
pub mod role_assignment;
pub mod roles;
pub mod summary;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_props_inventory;

// Re-exports for ergonomics
pub use inventory::deal_inventory;
pub use phase::{next_phase, Phase, PhaseOperation};
pub use records::{
    MembershipRole, Participant, ParticipantId, ParticipantStats, ResourceId, RoundSummary,
    RunStats, SessionId, SessionState,
};
pub use role_assignment::{assign_roles, Assignment};
pub use roles::{Role, RoleAssignment, RoundOutcome, ROLE_COUNT};
pub use summary::{apply_summary, check_played_resource, SummarySubmission};
