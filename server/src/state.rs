//! Shared server state: the current schedule snapshot behind an
//! `ArcSwap`, so a reload can publish a new one without a lock and
//! without interrupting in-flight queries against the old one.

use std::sync::Arc;

use arc_swap::ArcSwap;
use itinerary_engine::snapshot::Snapshot;

use crate::config::Config;

pub struct AppState {
    pub snapshot: ArcSwap<Snapshot>,
    pub config: Config,
}

impl AppState {
    pub fn new(snapshot: Snapshot, config: Config) -> AppState {
        AppState {
            snapshot: ArcSwap::from_pointee(snapshot),
            config,
        }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }

    /// Re-reads the schedule file named by `SCHEDULE_PATH` and, if it
    /// loads successfully, publishes it as the new snapshot. The old
    /// snapshot keeps serving any request already in flight against it.
    pub fn reload(&self) -> Result<(), ReloadError> {
        let bytes = std::fs::read(&self.config.schedule_path)?;
        let snapshot = Snapshot::build(&bytes, self.config.transfer_policy)?;
        self.snapshot.store(Arc::new(snapshot));
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error("failed to read schedule file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Snapshot(#[from] itinerary_engine::snapshot::SnapshotError),
}
