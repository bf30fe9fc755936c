//! Extraction of an embedded library into a fresh temporary directory,
//! and cleanup of what the platform would not let us delete right away.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use trident_core::platform::Platform;

/// A library file copied out of the resource bundle.
pub struct Extracted {
    dir: TempDir,
    path: PathBuf,
}

impl Extracted {
    /// Copy `bytes` to `<new temp dir>/<file_name>`.
    pub fn write(bytes: &[u8], file_name: &str, prefix: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
        let path = dir.path().join(file_name);
        fs::write(&path, bytes)?;
        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Dispose of the extracted copy once a load has been attempted.
    ///
    /// Where the platform allows removing a mapped file, the file and its
    /// directory are deleted now. Otherwise, or when deletion fails, the
    /// directory is handed to `deferred` for removal at shutdown.
    pub fn finish(self, platform: Platform, deferred: &DeferredCleanup) {
        let Extracted { dir, path } = self;
        if !platform.deletes_loaded_files() {
            deferred.register(dir.keep());
            return;
        }

        let dir_path = dir.path().to_path_buf();
        if let Err(e) = fs::remove_file(&path) {
            tracing::debug!(path = %path.display(), error = %e, "could not remove extracted library");
        }
        if let Err(e) = dir.close() {
            tracing::debug!(dir = %dir_path.display(), error = %e, "could not remove extraction dir");
            deferred.register(dir_path);
        }
    }
}

/// Directories to delete when the process shuts down.
#[derive(Debug, Clone, Default)]
pub struct DeferredCleanup {
    pending: Arc<Mutex<Vec<PathBuf>>>,
}

impl DeferredCleanup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, dir: PathBuf) {
        self.lock().push(dir);
    }

    pub fn pending(&self) -> Vec<PathBuf> {
        self.lock().clone()
    }

    /// Remove every registered directory. Failures are ignored; the
    /// returned count covers only directories actually removed.
    pub fn run(&self) -> usize {
        let dirs: Vec<PathBuf> = self.lock().drain(..).collect();
        let mut removed = 0;
        for dir in dirs {
            match fs::remove_dir_all(&dir) {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::debug!(dir = %dir.display(), error = %e, "deferred cleanup failed");
                }
            }
        }
        removed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PathBuf>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
