use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::parsers::browser::Browser;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot create snapshot in {dir}: {source}")]
    Create {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot copy {src}: {source}")]
    Copy {
        src: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// SQLite creates these beside a WAL-mode database when it is opened, and a
/// read-only connection cannot remove them again.
const SIDECAR_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// Private byte-copy of a browser database.
///
/// The copy lives in the scratch directory under a unique name. It is removed,
/// together with any SQLite sidecar files, when the snapshot is dropped.
#[derive(Debug)]
pub struct Snapshot {
    file: Option<NamedTempFile>,
    path: PathBuf,
    bytes: u64,
}

impl Snapshot {
    pub fn create(
        browser: Browser,
        src: &Path,
        scratch_dir: &Path,
    ) -> Result<Self, SnapshotError> {
        let mut file = tempfile::Builder::new()
            .prefix(&format!("{}_", browser.snapshot_prefix()))
            .tempfile_in(scratch_dir)
            .map_err(|source| SnapshotError::Create {
                dir: scratch_dir.to_path_buf(),
                source,
            })?;

        let copy_err = |source| SnapshotError::Copy {
            src: src.to_path_buf(),
            source,
        };
        let mut reader = File::open(src).map_err(copy_err)?;
        let bytes = io::copy(&mut reader, file.as_file_mut()).map_err(copy_err)?;
        file.as_file_mut().flush().map_err(copy_err)?;

        debug!(
            "copied {} ({} bytes) to {}",
            src.display(),
            bytes,
            file.path().display()
        );
        Ok(Self {
            path: file.path().to_path_buf(),
            file: Some(file),
            bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn byte_count(&self) -> u64 {
        self.bytes
    }

    /// Removes the copy now, logging instead of failing when removal does not
    /// succeed. Dropping the snapshot removes it silently.
    pub fn close(mut self) {
        if let Some(Err(err)) = self.file.take().map(NamedTempFile::close) {
            warn!("failed to remove snapshot {}: {err}", self.path.display());
        }
        for result in remove_sidecars(&self.path) {
            if let Err((path, err)) = result {
                warn!("failed to remove {}: {err}", path.display());
            }
        }
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        // `file` removes the main copy when it drops after this.
        let _ = remove_sidecars(&self.path);
    }
}

fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Deletes whichever sidecars exist, reporting every failed removal.
fn remove_sidecars(path: &Path) -> Vec<Result<(), (PathBuf, io::Error)>> {
    SIDECAR_SUFFIXES
        .iter()
        .map(|suffix| sidecar_path(path, suffix))
        .filter(|sidecar| sidecar.exists())
        .map(|sidecar| std::fs::remove_file(&sidecar).map_err(|err| (sidecar, err)))
        .collect()
}
