//! Shared state channel: the document store the session core reads and
//! writes through.
//!
//! The core never talks to a concrete store. It subscribes to records and
//! submits all-or-nothing batches through [`SharedStateChannel`];
//! [`memory::InMemoryChannel`] is the reference implementation.

pub mod memory;
pub mod subscription;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Participant, ParticipantId, RunStats, SessionId, SessionState};

pub use memory::InMemoryChannel;
pub use subscription::{Feed, StoreSnapshot, Subscription};

/// Channel-level failures. A failed write leaves every record at its prior
/// committed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("channel unavailable: {0}")]
    Unavailable(String),
    #[error("write rejected: {0}")]
    Rejected(String),
    #[error("channel closed")]
    Closed,
    #[error("corrupt record at {path}: {detail}")]
    Corrupt { path: String, detail: String },
}

/// Address of one logical record, keyed by session and participant id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordPath {
    Session(SessionId),
    Stats(SessionId),
    Participant(SessionId, ParticipantId),
}

impl RecordPath {
    pub fn session_id(&self) -> &SessionId {
        match self {
            RecordPath::Session(id) | RecordPath::Stats(id) | RecordPath::Participant(id, _) => id,
        }
    }
}

impl fmt::Display for RecordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordPath::Session(id) => write!(f, "sessions/{id}"),
            RecordPath::Stats(id) => write!(f, "sessions/{id}/stats"),
            RecordPath::Participant(id, pid) => write!(f, "sessions/{id}/participants/{pid}"),
        }
    }
}

/// Any record the channel can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Record {
    Session(SessionState),
    Stats(RunStats),
    Participant(Participant),
}

impl Record {
    /// Whether this record shape belongs at `path`.
    pub fn fits(&self, path: &RecordPath) -> bool {
        match (self, path) {
            (Record::Session(_), RecordPath::Session(_)) => true,
            (Record::Stats(_), RecordPath::Stats(_)) => true,
            (Record::Participant(p), RecordPath::Participant(_, pid)) => p.id == *pid,
            _ => false,
        }
    }

    pub fn into_session(self) -> Option<SessionState> {
        match self {
            Record::Session(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_stats(self) -> Option<RunStats> {
        match self {
            Record::Stats(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_participant(self) -> Option<Participant> {
        match self {
            Record::Participant(p) => Some(p),
            _ => None,
        }
    }
}

/// Ordered set of puts that must commit together.
///
/// A later put to the same path replaces an earlier one.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    writes: BTreeMap<RecordPath, Record>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, path: RecordPath, record: Record) -> &mut Self {
        self.writes.insert(path, record);
        self
    }

    pub fn put_session(&mut self, session_id: &SessionId, state: SessionState) -> &mut Self {
        self.put(RecordPath::Session(session_id.clone()), Record::Session(state))
    }

    pub fn put_stats(&mut self, session_id: &SessionId, stats: RunStats) -> &mut Self {
        self.put(RecordPath::Stats(session_id.clone()), Record::Stats(stats))
    }

    pub fn put_participant(&mut self, session_id: &SessionId, participant: Participant) -> &mut Self {
        let path = RecordPath::Participant(session_id.clone(), participant.id.clone());
        self.put(path, Record::Participant(participant))
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecordPath, &Record)> {
        self.writes.iter()
    }

    pub fn into_writes(self) -> BTreeMap<RecordPath, Record> {
        self.writes
    }
}

/// Document store consumed by the session core.
///
/// `subscribe` delivers the current value first and every committed change
/// after it. `atomic_write` commits the whole batch or nothing.
/// `single_write` is for independent per-participant updates.
#[async_trait]
pub trait SharedStateChannel: Send + Sync {
    fn subscribe(&self, path: &RecordPath) -> Subscription;

    async fn atomic_write(&self, batch: WriteBatch) -> Result<(), ChannelError>;

    async fn single_write(&self, path: RecordPath, record: Record) -> Result<(), ChannelError>;
}
