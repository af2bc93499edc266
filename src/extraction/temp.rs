//! Scoped ownership of intermediate files

use std::path::PathBuf;

/// Files created during one decode run.
///
/// Registered files are deleted when the registry is released or dropped,
/// unless `keep` is set.
#[derive(Debug)]
pub struct TempFiles {
    paths: Vec<PathBuf>,
    keep: bool,
}

impl TempFiles {
    pub fn new(keep: bool) -> Self {
        Self { paths: Vec::new(), keep }
    }

    pub fn register(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Delete registered files and return how many were removed.
    ///
    /// Failures are logged and do not stop the remaining deletions.
    pub fn release(&mut self) -> usize {
        let paths = std::mem::take(&mut self.paths);

        if self.keep {
            for path in &paths {
                log::info!("Keeping temporary file {}", path.display());
            }
            return 0;
        }

        let mut removed = 0;
        for path in paths {
            if !path.exists() {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    log::debug!("Removed temporary file {}", path.display());
                    removed += 1;
                }
                Err(e) => log::warn!("Failed to delete temporary file {}: {}", path.display(), e),
            }
        }
        removed
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        self.release();
    }
}
