//! Record subscriptions over a shared, versioned store snapshot.
//!
//! A channel publishes its whole store as one [`StoreSnapshot`] per commit.
//! Every [`Subscription`] watches the same snapshot stream and projects its
//! own record out of it, so records read from one snapshot always come from
//! the same set of committed batches.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};

use super::{ChannelError, Record, RecordPath};

/// Latest state of one record as delivered to subscribers.
///
/// `error` is the subscription's error slot: a failed read lands here
/// while `record` keeps the last good snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    pub record: Option<Record>,
    pub version: u64,
    pub error: Option<ChannelError>,
}

/// Immutable view of every record after some commit.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    revision: u64,
    feeds: HashMap<RecordPath, Feed>,
}

impl StoreSnapshot {
    /// Bumped once per published change, whatever it touched.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Feed at `path`; a default feed if nothing was ever written there.
    pub fn feed(&self, path: &RecordPath) -> Feed {
        self.feeds.get(path).cloned().unwrap_or_default()
    }

    pub fn record(&self, path: &RecordPath) -> Option<Record> {
        self.feeds.get(path).and_then(|f| f.record.clone())
    }

    pub fn error(&self, path: &RecordPath) -> Option<ChannelError> {
        self.feeds.get(path).and_then(|f| f.error.clone())
    }

    /// Store `record` at `path`, clearing its error slot.
    pub(crate) fn put(&mut self, path: RecordPath, record: Record) {
        let feed = self.feeds.entry(path).or_default();
        feed.record = Some(record);
        feed.version += 1;
        feed.error = None;
    }

    pub(crate) fn set_error(&mut self, path: RecordPath, err: ChannelError) {
        self.feeds.entry(path).or_default().error = Some(err);
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision += 1;
    }
}

/// Live view of one record. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    path: RecordPath,
    rx: watch::Receiver<Arc<StoreSnapshot>>,
    last: Feed,
}

impl Subscription {
    pub fn new(path: RecordPath, rx: watch::Receiver<Arc<StoreSnapshot>>) -> Self {
        let last = rx.borrow().feed(&path);
        Self { path, rx, last }
    }

    pub fn path(&self) -> &RecordPath {
        &self.path
    }

    /// The whole store as last published. Read several records from one
    /// snapshot when they have to agree with each other.
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        Arc::clone(&self.rx.borrow())
    }

    /// Last delivered snapshot, if the record exists.
    pub fn latest(&self) -> Option<Record> {
        self.rx.borrow().record(&self.path)
    }

    pub fn version(&self) -> u64 {
        self.rx.borrow().feed(&self.path).version
    }

    pub fn error(&self) -> Option<ChannelError> {
        self.rx.borrow().error(&self.path)
    }

    /// Wait until this record's feed changes and return it. Commits that
    /// leave this record alone are skipped.
    pub async fn changed(&mut self) -> Result<Feed, ChannelError> {
        loop {
            self.rx.changed().await.map_err(|_| ChannelError::Closed)?;
            let feed = self.rx.borrow_and_update().feed(&self.path);
            if feed != self.last {
                self.last = feed.clone();
                return Ok(feed);
            }
        }
    }

    /// Stream of this record's feeds, starting with the current one.
    pub fn into_stream(self) -> impl Stream<Item = Feed> + Unpin + Send + 'static {
        let path = self.path;
        let mut last: Option<Feed> = None;
        WatchStream::new(self.rx).filter_map(move |snapshot| {
            let feed = snapshot.feed(&path);
            if last.as_ref() == Some(&feed) {
                return None;
            }
            last = Some(feed.clone());
            Some(feed)
        })
    }
}
