//! In-process [`SharedStateChannel`] used by tests and the simulator.
//!
//! All records live behind one lock. A batch is validated, applied to a copy
//! of the store and published as a single new [`StoreSnapshot`] before the
//! lock is released. Readers either see the whole batch or none of it, and
//! batches are serialised so the last committed one wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::subscription::StoreSnapshot;
use super::{ChannelError, Record, RecordPath, SharedStateChannel, Subscription, WriteBatch};

struct Inner {
    tx: watch::Sender<Arc<StoreSnapshot>>,
    /// Injected failures keyed by the write attempt they hit.
    failures: BTreeMap<u64, ChannelError>,
    attempts: u64,
    commits: u64,
}

impl Inner {
    fn current(&self) -> Arc<StoreSnapshot> {
        Arc::clone(&self.tx.borrow())
    }

    fn publish(&self, next: StoreSnapshot) {
        self.tx.send_replace(Arc::new(next));
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<(), ChannelError> {
        self.attempts += 1;
        if let Some(err) = self.failures.remove(&self.attempts) {
            warn!(error = %err, records = batch.len(), attempt = self.attempts, "Injected write failure");
            return Err(err);
        }

        if let Some((path, _)) = batch.iter().find(|(path, record)| !record.fits(path)) {
            return Err(ChannelError::Rejected(format!(
                "record shape does not match {path}"
            )));
        }

        let count = batch.len();
        let mut next = StoreSnapshot::clone(&self.current());
        for (path, record) in batch.into_writes() {
            next.put(path, record);
        }
        next.bump_revision();
        let revision = next.revision();
        self.publish(next);

        self.commits += 1;
        debug!(records = count, commit = self.commits, revision, "Batch committed");
        Ok(())
    }
}

/// Shared state held in memory.
pub struct InMemoryChannel {
    inner: Mutex<Inner>,
}

impl Default for InMemoryChannel {
    fn default() -> Self {
        let (tx, _) = watch::channel(Arc::new(StoreSnapshot::default()));
        Self {
            inner: Mutex::new(Inner {
                tx,
                failures: BTreeMap::new(),
                attempts: 0,
                commits: 0,
            }),
        }
    }
}

impl InMemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current committed value at `path`.
    pub fn read(&self, path: &RecordPath) -> Option<Record> {
        self.inner.lock().current().record(path)
    }

    /// Number of writes that have committed so far.
    pub fn commits(&self) -> u64 {
        self.inner.lock().commits
    }

    /// Make the next write fail with `err` and change nothing.
    pub fn fail_next_write(&self, err: ChannelError) {
        self.fail_write_after(0, err);
    }

    /// Let the next `skip` writes through, then fail the one after with
    /// `err`.
    pub fn fail_write_after(&self, skip: u64, err: ChannelError) {
        let mut inner = self.inner.lock();
        let attempt = inner.attempts + 1 + skip;
        inner.failures.insert(attempt, err);
    }

    /// Deliver a read failure into the error slot of every subscriber of
    /// `path`. The last good snapshot stays readable.
    pub fn push_read_error(&self, path: &RecordPath, err: ChannelError) {
        let inner = self.inner.lock();
        let mut next = StoreSnapshot::clone(&inner.current());
        next.set_error(path.clone(), err);
        next.bump_revision();
        inner.publish(next);
    }
}

#[async_trait]
impl SharedStateChannel for InMemoryChannel {
    fn subscribe(&self, path: &RecordPath) -> Subscription {
        let rx = self.inner.lock().tx.subscribe();
        Subscription::new(path.clone(), rx)
    }

    async fn atomic_write(&self, batch: WriteBatch) -> Result<(), ChannelError> {
        self.inner.lock().commit(batch)
    }

    async fn single_write(&self, path: RecordPath, record: Record) -> Result<(), ChannelError> {
        let mut batch = WriteBatch::new();
        batch.put(path, record);
        self.inner.lock().commit(batch)
    }
}
