//! Domain-level error type used by the pure session logic.
//!
//! This error type knows nothing about the shared state channel. Services
//! return `Result<T, crate::error::SessionError>` and convert from
//! `DomainError` through the provided `From` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Validation failure kinds raised by pure domain helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Operation is not allowed from the current phase.
    PhaseMismatch,
    /// Role assignment requested for 0 or more than 5 participants.
    UnsupportedParticipantCount,
    /// Role universe is not 5 distinct roles.
    InvalidRoleUniverse,
    /// Round summary is missing a required field or carries a forbidden one.
    MalformedSummary,
    /// Resource pool cannot supply the requested sample.
    ResourcePoolTooSmall,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input validation or business rule violation
    Validation(ValidationKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn kind(&self) -> &ValidationKind {
        match self {
            DomainError::Validation(kind, _) => kind,
        }
    }
}
