use thiserror::Error;

use crate::channel::ChannelError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::errors::ErrorCode;

/// Failure of a session operation. Every variant except `Channel` is raised
/// before any write is attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Not owner: {detail}")]
    NotOwner { detail: String },
    #[error("Invalid phase: {detail}")]
    InvalidPhase { detail: String },
    #[error("Missing state: {detail}")]
    MissingState { detail: String },
    #[error("Malformed summary: {detail}")]
    MalformedSummary { detail: String },
    #[error("Unsupported participant count: {detail}")]
    UnsupportedParticipantCount { detail: String },
    #[error("Validation error: {detail}")]
    Validation { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl SessionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotOwner { .. } => ErrorCode::NotOwner,
            SessionError::InvalidPhase { .. } => ErrorCode::InvalidPhase,
            SessionError::MissingState { .. } => ErrorCode::MissingState,
            SessionError::MalformedSummary { .. } => ErrorCode::MalformedSummary,
            SessionError::UnsupportedParticipantCount { .. } => {
                ErrorCode::UnsupportedParticipantCount
            }
            SessionError::Validation { .. } => ErrorCode::ValidationError,
            SessionError::Config { .. } => ErrorCode::ConfigError,
            SessionError::Channel(err) => match err {
                ChannelError::Unavailable(_) => ErrorCode::ChannelUnavailable,
                ChannelError::Rejected(_) => ErrorCode::ChannelRejected,
                ChannelError::Closed => ErrorCode::ChannelClosed,
                ChannelError::Corrupt { .. } => ErrorCode::DataCorruption,
            },
        }
    }

    pub fn not_owner(detail: impl Into<String>) -> Self {
        Self::NotOwner {
            detail: detail.into(),
        }
    }

    pub fn invalid_phase(detail: impl Into<String>) -> Self {
        Self::InvalidPhase {
            detail: detail.into(),
        }
    }

    pub fn missing(detail: impl Into<String>) -> Self {
        Self::MissingState {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn unsupported_count(count: usize) -> Self {
        Self::UnsupportedParticipantCount {
            detail: format!("{count} participants"),
        }
    }

    /// Channel failures are the only ones that happen after a write was issued.
    pub fn is_channel(&self) -> bool {
        matches!(self, SessionError::Channel(_))
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        let DomainError::Validation(kind, detail) = err;
        match kind {
            ValidationKind::PhaseMismatch => SessionError::InvalidPhase { detail },
            ValidationKind::UnsupportedParticipantCount => {
                SessionError::UnsupportedParticipantCount { detail }
            }
            ValidationKind::MalformedSummary => SessionError::MalformedSummary { detail },
            ValidationKind::ResourcePoolTooSmall => SessionError::Config { detail },
            ValidationKind::InvalidRoleUniverse | ValidationKind::Other(_) => {
                SessionError::Validation { detail }
            }
        }
    }
}
