//! Atomic output writes.
//!
//! Each file is written to a temporary file in the destination directory
//! and renamed into place, so an interrupted run never leaves a truncated
//! PNG behind.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::CliError;

/// Write `bytes` to `path`, replacing any existing file.
///
/// If the temporary file cannot be removed after a failure, that is
/// logged and the original write error is returned.
///
/// # Errors
///
/// Returns [`CliError::Write`] if the temporary file cannot be created,
/// written, or renamed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let write_err = |source: std::io::Error| CliError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    if let Err(e) = tmp.write_all(bytes).and_then(|()| tmp.as_file().sync_all()) {
        discard(tmp);
        return Err(write_err(e));
    }
    tmp.persist(path).map_err(|e| {
        discard(e.file);
        write_err(e.error)
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}

fn discard(tmp: NamedTempFile) {
    let tmp_path = tmp.path().to_path_buf();
    if let Err(e) = tmp.close() {
        tracing::warn!(path = %tmp_path.display(), error = %e, "failed to remove temporary file");
    }
}
