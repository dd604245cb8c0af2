//! Atomic I/O operations with file locking

use crate::{Error, Result};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Write content atomically to a file with locking.
///
/// The bytes go to a sibling temp file which is then renamed over `path`,
/// so a reader sees either the old document or the new one. Missing parent
/// directories are created. The temp file is removed if any step fails.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    create_parents(path)?;

    // Same directory as the target so the rename stays on one filesystem.
    let temp_path = temp_path_for(path);
    let result = write_locked(&temp_path, path, content)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::io(path, e)));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_locked(temp_path: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    let lock_failed = |_: std::io::Error| Error::LockFailed {
        path: target.to_path_buf(),
    };
    file.lock_exclusive().map_err(lock_failed)?;
    file.write_all(content).map_err(|e| Error::io(temp_path, e))?;
    file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    file.unlock().map_err(lock_failed)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

fn create_parents(path: &Path) -> Result<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => fs::create_dir_all(parent).map_err(|e| Error::io(parent, e)),
        None => Ok(()),
    }
}

/// Read raw bytes from a file.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::io(path, e))
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Make sure a file exists, creating it (and its parents) empty if absent.
///
/// Returns `true` when the file had to be created. An existing file is
/// never opened for writing, so its content survives a concurrent caller.
pub fn ensure_file(path: &Path) -> Result<bool> {
    create_parents(path)?;
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => {
            tracing::debug!(?path, "Created empty file");
            file.sync_all().map_err(|e| Error::io(path, e))?;
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_file() => Ok(false),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(Error::io(
            path,
            std::io::Error::new(ErrorKind::InvalidInput, "path exists but is not a file"),
        )),
        Err(e) => Err(Error::io(path, e)),
    }
}
