//! Flat-file snapshot storage.
//!
//! Keeps two generations of the package list in the state directory:
//! - previous: what was available before the most recent update
//! - available: what the most recent update reported
//!
//! Each file holds one `name version` pair per line. Writes go through a
//! temp file in the same directory followed by a rename, so readers only
//! ever see a whole file.

pub mod diff;
pub mod snapshot;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

pub use snapshot::{PackageRecord, Snapshot, SnapshotId};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no {id} snapshot at {}", path.display())]
    NotFound { id: SnapshotId, path: PathBuf },

    #[error("snapshot storage error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Owns the snapshot files. Nothing else writes them.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SnapshotStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, id: SnapshotId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    pub fn load(&self, id: SnapshotId) -> Result<Snapshot, StoreError> {
        let path = self.path(id);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Snapshot::parse(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound { id, path }),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Like [`load`](Self::load) but a missing file reads as empty.
    ///
    /// Before the first update neither file exists; callers treat that as an
    /// empty package list rather than an error.
    pub fn load_or_empty(&self, id: SnapshotId) -> Result<Snapshot, StoreError> {
        match self.load(id) {
            Err(StoreError::NotFound { .. }) => Ok(Snapshot::new()),
            other => other,
        }
    }

    /// Atomically replaces the snapshot file.
    ///
    /// The temp file is removed on drop if anything fails before the rename.
    pub fn save(&self, id: SnapshotId, snapshot: &Snapshot) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let path = self.path(id);
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err(&self.dir))?;
        tmp.write_all(snapshot.render().as_bytes())
            .map_err(io_err(tmp.path()))?;
        tmp.as_file().sync_all().map_err(io_err(&path))?;
        tmp.persist(&path).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e.error,
        })?;
        sync_dir(&self.dir)?;

        info!(snapshot = %id, packages = snapshot.len(), path = %path.display(), "saved snapshot");
        Ok(())
    }

    /// Moves `available` over `previous`.
    ///
    /// Returns false when there was no `available` file yet, in which case
    /// `previous` is left untouched. The rename is durable before this
    /// returns.
    pub fn rotate(&self) -> Result<bool, StoreError> {
        let from = self.path(SnapshotId::Available);
        let to = self.path(SnapshotId::Previous);

        match fs::rename(&from, &to) {
            Ok(()) => {
                sync_dir(&self.dir)?;
                info!(from = %from.display(), to = %to.display(), "rotated snapshots");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %from.display(), "nothing to rotate");
                Ok(false)
            }
            Err(source) => Err(StoreError::Io { path: from, source }),
        }
    }

    /// Removes both snapshot files.
    pub fn reset(&self) -> Result<(), StoreError> {
        for id in [SnapshotId::Previous, SnapshotId::Available] {
            let path = self.path(id);
            match fs::remove_file(&path) {
                Ok(()) => info!(path = %path.display(), "removed snapshot"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(StoreError::Io { path, source }),
            }
        }
        Ok(())
    }

    /// When `available` was last written, if ever.
    pub fn last_update(&self) -> Result<Option<SystemTime>, StoreError> {
        let path = self.path(SnapshotId::Available);
        match fs::metadata(&path) {
            Ok(meta) => Ok(Some(meta.modified().map_err(io_err(&path))?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

fn sync_dir(dir: &Path) -> Result<(), StoreError> {
    File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(io_err(dir))
}
