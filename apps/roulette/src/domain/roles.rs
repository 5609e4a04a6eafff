//! Lane roles and per-participant role slots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Size of the role universe; also the hard roster cap.
pub const ROLE_COUNT: usize = 5;

/// One of the five lanes a participant can be rolled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

impl Role {
    /// The canonical role universe, in display order.
    pub const ALL: [Role; ROLE_COUNT] = [
        Role::Top,
        Role::Jungle,
        Role::Mid,
        Role::Adc,
        Role::Support,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JUNGLE",
            Role::Mid => "MID",
            Role::Adc => "ADC",
            Role::Support => "SUPPORT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles handed to one participant for a round.
///
/// `secondary` is never equal to `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub main: Role,
    pub secondary: Option<Role>,
}

/// Self-reported result of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoundOutcome {
    Win,
    Loss,
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundOutcome::Win => f.write_str("WIN"),
            RoundOutcome::Loss => f.write_str("LOSS"),
        }
    }
}
