//! Constrained-random role assignment.
//!
//! Mains are always distinct. Secondaries come first from the roles nobody
//! holds as main; once that pool runs dry (3+ participants) the remaining
//! participants draw any role other than their own main, so secondaries may
//! repeat across participants.

use std::collections::{BTreeMap, BTreeSet};

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::domain::records::ParticipantId;
use crate::domain::roles::{Role, RoleAssignment, ROLE_COUNT};
use crate::errors::domain::{DomainError, ValidationKind};

/// Assignment result keyed by participant.
pub type Assignment = BTreeMap<ParticipantId, RoleAssignment>;

/// Assign roles to `participants` from a universe of five distinct roles.
///
/// Fails with `UnsupportedParticipantCount` for an empty roster or one with
/// more than five entries; nothing is drawn from `rng` in that case.
pub fn assign_roles<R: Rng + ?Sized>(
    participants: &[ParticipantId],
    universe: &[Role],
    rng: &mut R,
) -> Result<Assignment, DomainError> {
    let n = participants.len();
    if n == 0 || n > ROLE_COUNT {
        return Err(DomainError::validation(
            ValidationKind::UnsupportedParticipantCount,
            format!("Role assignment needs 1..={ROLE_COUNT} participants, got {n}"),
        ));
    }
    validate_universe(universe)?;

    let distinct: BTreeSet<&ParticipantId> = participants.iter().collect();
    if distinct.len() != n {
        return Err(DomainError::validation(
            ValidationKind::Other("DUPLICATE_PARTICIPANT".into()),
            "Participant ids must be unique",
        ));
    }

    let mut order = participants.to_vec();
    order.shuffle(rng);
    let mut roles = universe.to_vec();
    roles.shuffle(rng);

    let (mains, unused) = roles.split_at(n);
    let mut spare = unused.to_vec();
    spare.shuffle(rng);

    let mut assignment = Assignment::new();
    for (idx, (participant, &main)) in order.into_iter().zip(mains).enumerate() {
        let secondary = if n == ROLE_COUNT {
            None
        } else if let Some(&role) = spare.get(idx) {
            Some(role)
        } else {
            let others: Vec<Role> = universe.iter().copied().filter(|r| *r != main).collect();
            others.choose(rng).copied()
        };
        assignment.insert(participant, RoleAssignment { main, secondary });
    }

    Ok(assignment)
}

fn validate_universe(universe: &[Role]) -> Result<(), DomainError> {
    let distinct: BTreeSet<Role> = universe.iter().copied().collect();
    if universe.len() != ROLE_COUNT || distinct.len() != ROLE_COUNT {
        return Err(DomainError::validation(
            ValidationKind::InvalidRoleUniverse,
            format!("Role universe must hold {ROLE_COUNT} distinct roles"),
        ));
    }
    Ok(())
}
