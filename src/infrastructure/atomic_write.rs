//! Replace-by-rename file writes.

use std::io::{self, Write};
use std::path::Path;

/// Writes `content` to a temporary file next to `path` and renames it into
/// place, creating parent directories as needed. Readers see either the old
/// file or the new one.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content)?;
    temp_file.persist(path).map_err(|e| e.error)?;

    Ok(())
}
