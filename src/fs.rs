//! File system utilities.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Writes content to a file atomically using a temp file and rename.
///
/// The temp file is created next to the target so the rename stays on the
/// same filesystem. An interrupted save never leaves a truncated transcript.
///
/// # Errors
///
/// Returns an error if the temp file cannot be written or renamed.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = parent.join(format!(".{file_name}.tmp"));

    let result = fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write {}", temp_path.display()))
        .and_then(|()| {
            fs::rename(&temp_path, path)
                .with_context(|| format!("Failed to replace {}", path.display()))
        });

    // The temp file must not outlive a failed save.
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}
