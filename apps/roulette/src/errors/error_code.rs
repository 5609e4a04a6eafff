//! Error codes surfaced to callers of the session core.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE.

use core::fmt;

/// Centralized error codes for session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Owner-only operation invoked by a non-owner
    NotOwner,
    /// Operation not permitted in the current phase
    InvalidPhase,
    /// Session, stats or participant record not available yet
    MissingState,
    /// Round summary failed validation
    MalformedSummary,
    /// Role assignment requested for an unsupported roster size
    UnsupportedParticipantCount,
    /// Shared state channel is unreachable
    ChannelUnavailable,
    /// Shared state channel refused the write
    ChannelRejected,
    /// Subscription or channel has been closed
    ChannelClosed,
    /// Stored record does not have the expected shape
    DataCorruption,
    /// Invalid configuration
    ConfigError,
    /// General validation error
    ValidationError,
}

impl ErrorCode {
    /// Canonical string form of this code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotOwner => "NOT_OWNER",
            Self::InvalidPhase => "INVALID_PHASE",
            Self::MissingState => "MISSING_STATE",
            Self::MalformedSummary => "MALFORMED_SUMMARY",
            Self::UnsupportedParticipantCount => "UNSUPPORTED_PARTICIPANT_COUNT",
            Self::ChannelUnavailable => "CHANNEL_UNAVAILABLE",
            Self::ChannelRejected => "CHANNEL_REJECTED",
            Self::ChannelClosed => "CHANNEL_CLOSED",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
