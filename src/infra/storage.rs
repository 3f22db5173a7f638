//! Permanent file storage tree.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::STORAGE_SUBDIRECTORIES;

/// Directories created by one `ensure_storage_tree` call.
///
/// Unless `keep` is called, dropping the guard removes them again (deepest
/// first), so a failed bootstrap leaves the filesystem as it found it.
#[derive(Debug)]
pub struct CreatedDirs {
    created: Vec<PathBuf>,
    kept: bool,
}

impl CreatedDirs {
    /// Directories that did not exist before
    pub fn paths(&self) -> &[PathBuf] {
        &self.created
    }

    /// Keep the directories; call once the surrounding work succeeded.
    pub fn keep(mut self) -> Vec<PathBuf> {
        self.kept = true;
        std::mem::take(&mut self.created)
    }
}

impl Drop for CreatedDirs {
    fn drop(&mut self) {
        if self.kept {
            return;
        }
        for dir in self.created.iter().rev() {
            // remove_dir refuses non-empty directories, so foreign content survives
            match std::fs::remove_dir(dir) {
                Ok(()) => tracing::debug!(path = %dir.display(), "Removed storage directory"),
                Err(e) => {
                    tracing::warn!(path = %dir.display(), error = %e, "Failed to remove storage directory")
                }
            }
        }
    }
}

/// Create the storage root and every required subdirectory that is missing.
///
/// On error, directories created so far are removed before returning.
pub fn ensure_storage_tree(root: &Path) -> Result<CreatedDirs, (PathBuf, io::Error)> {
    let mut guard = CreatedDirs {
        created: Vec::new(),
        kept: false,
    };

    let targets = std::iter::once(root.to_path_buf())
        .chain(STORAGE_SUBDIRECTORIES.iter().map(|sub| root.join(sub)));

    for dir in targets {
        create_missing(&dir, &mut guard.created).map_err(|e| (dir.clone(), e))?;
    }

    Ok(guard)
}

/// Create `dir` and any missing ancestors, recording each one created.
fn create_missing(dir: &Path, created: &mut Vec<PathBuf>) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut missing = Vec::new();
    let mut cursor = Some(dir);
    while let Some(path) = cursor {
        if path.as_os_str().is_empty() || path.is_dir() {
            break;
        }
        missing.push(path.to_path_buf());
        cursor = path.parent();
    }

    for path in missing.into_iter().rev() {
        std::fs::create_dir(&path)?;
        created.push(path);
    }
    Ok(())
}
