//! Session phase machine.
//!
//! Every phase change in the crate goes through [`next_phase`], so the
//! table below is the complete set of legal edges.
//!
//! | operation      | from             | to        |
//! |----------------|------------------|-----------|
//! | `StartRun`     | idle             | rolling   |
//! | `StartRound`   | any              | locked    |
//! | `Reroll`       | locked           | locked    |
//! | `EndRound`     | locked, summary  | summary   |
//! | `LockIn`       | locked           | locked    |
//! | `SubmitSummary`| summary          | summary   |
//! | `ResetRun`     | summary          | idle      |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// Overall session progression phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No run in progress.
    #[default]
    Idle,
    /// Run started, resources dealt, waiting for the first round.
    Rolling,
    /// Roles assigned; participants lock in.
    Locked,
    /// Outcome recorded; participants report their summaries.
    Summary,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Rolling => "rolling",
            Phase::Locked => "locked",
            Phase::Summary => "summary",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations that are gated by the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOperation {
    StartRun,
    StartRound,
    Reroll,
    EndRound,
    LockIn,
    SubmitSummary,
    ResetRun,
}

impl PhaseOperation {
    pub const fn as_str(self) -> &'static str {
        match self {
            PhaseOperation::StartRun => "start_run",
            PhaseOperation::StartRound => "start_round",
            PhaseOperation::Reroll => "reroll",
            PhaseOperation::EndRound => "end_round",
            PhaseOperation::LockIn => "lock_in",
            PhaseOperation::SubmitSummary => "submit_summary",
            PhaseOperation::ResetRun => "reset_run",
        }
    }
}

impl fmt::Display for PhaseOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the phase reached by applying `op` in `current`.
pub fn next_phase(current: Phase, op: PhaseOperation) -> Result<Phase, DomainError> {
    let next = match (op, current) {
        (PhaseOperation::StartRun, Phase::Idle) => Some(Phase::Rolling),
        (PhaseOperation::StartRound, _) => Some(Phase::Locked),
        (PhaseOperation::Reroll, Phase::Locked) => Some(Phase::Locked),
        (PhaseOperation::EndRound, Phase::Locked | Phase::Summary) => Some(Phase::Summary),
        (PhaseOperation::LockIn, Phase::Locked) => Some(Phase::Locked),
        (PhaseOperation::SubmitSummary, Phase::Summary) => Some(Phase::Summary),
        (PhaseOperation::ResetRun, Phase::Summary) => Some(Phase::Idle),
        _ => None,
    };

    next.ok_or_else(|| {
        DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("{op} is not allowed while the session is {current}"),
        )
    })
}
