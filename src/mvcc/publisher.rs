use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use tracing::{info, warn};
use crate::core::config::QueryConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::RawDocument;
use crate::mvcc::snapshot::Snapshot;
use crate::query::engine::QueryEngine;
use crate::writer::index_builder::{CancelFlag, IndexBuilder};

/// Holds the snapshot currently served to readers.
///
/// Readers load the current `Arc<Snapshot>` without locking and keep it for
/// as long as they like; a publish swaps the reference in a single store, so
/// a reader sees either the old snapshot or the new one in full.
pub struct SnapshotPublisher {
    current: ArcSwapOption<Snapshot>,
    generation: AtomicU64,
    rebuild_lock: Mutex<()>, // Single rebuilder
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        SnapshotPublisher {
            current: ArcSwapOption::empty(),
            generation: AtomicU64::new(0),
            rebuild_lock: Mutex::new(()),
        }
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let publisher = Self::new();
        publisher.publish(snapshot);
        publisher
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    /// Number of snapshots published so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        self.publish_arc(Arc::new(snapshot))
    }

    pub fn publish_arc(&self, snapshot: Arc<Snapshot>) -> Arc<Snapshot> {
        let previous = self.current.swap(Some(snapshot.clone()));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        info!(
            snapshot = %snapshot.id(),
            previous = ?previous.map(|s| s.id()),
            generation,
            documents = snapshot.doc_count(),
            terms = snapshot.term_count(),
            "published snapshot"
        );
        snapshot
    }

    /// Build a new snapshot off to the side and publish it on success.
    /// On failure the previously published snapshot stays in place.
    pub fn rebuild(&self, builder: &IndexBuilder, corpus: &[RawDocument]) -> Result<Arc<Snapshot>> {
        self.rebuild_with_cancel(builder, corpus, &CancelFlag::new())
    }

    pub fn rebuild_with_cancel(
        &self,
        builder: &IndexBuilder,
        corpus: &[RawDocument],
        cancel: &CancelFlag,
    ) -> Result<Arc<Snapshot>> {
        let _guard = self.rebuild_lock.lock();

        match builder.build_with_cancel(corpus, cancel) {
            Ok(snapshot) => Ok(self.publish(snapshot)),
            Err(err) => {
                warn!(
                    error = %err,
                    generation = self.generation(),
                    "rebuild failed, keeping previously published snapshot"
                );
                Err(err)
            }
        }
    }

    /// Query engine bound to the snapshot published right now
    pub fn engine(&self, config: QueryConfig) -> Result<QueryEngine> {
        let snapshot = self.current().ok_or_else(|| Error::new(
            ErrorKind::InvalidState,
            "no snapshot has been published yet",
        ))?;
        Ok(QueryEngine::new(snapshot, config))
    }
}

impl Default for SnapshotPublisher {
    fn default() -> Self {
        Self::new()
    }
}
