//! Cycle data read from JSON snapshot files.
//!
//! A snapshot directory holds one `<cycle>.json` file per cycle in the
//! indexer's camelCase shape (`cycleDelegatedBalance`, `cycleShares`, ...).

use std::path::{Path, PathBuf};

use crumbs_engine::{CycleDataSource, EngineError};
use crumbs_types::{Address, Cycle, CycleData};

/// Default snapshot directory, relative to the working directory.
pub const DEFAULT_SNAPSHOT_DIR: &str = "snapshots";

/// A [`CycleDataSource`] backed by a directory of snapshot files.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    dir: PathBuf,
}

impl SnapshotSource {
    /// Read snapshots from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the snapshot for `cycle`.
    pub fn snapshot_path(&self, cycle: Cycle) -> PathBuf {
        self.dir.join(format!("{cycle}.json"))
    }
}

fn read_snapshot(path: &Path) -> crumbs_engine::Result<CycleData> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| EngineError::Fetch(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| EngineError::Fetch(format!("{}: {e}", path.display())))
}

impl CycleDataSource for SnapshotSource {
    fn fetch_cycle_data(&self, baker: &Address, cycle: Cycle) -> crumbs_engine::Result<CycleData> {
        let path = self.snapshot_path(cycle);
        tracing::debug!(%baker, cycle, path = %path.display(), "reading snapshot");
        read_snapshot(&path)
    }
}
