//! File-oriented commands: show, create, add-to-context, edit capture and undo.
//!
//! Every operation reports its own outcome on `out`. Filesystem failures are
//! printed and leave session state unchanged; only a failing `out` is an `Err`.

mod template;

use anyhow::Result;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

pub use template::{TEMPLATES, template_for};

use crate::chat::SessionState;
use crate::diff::{DiffStyle, render_diff};
use crate::ui::{Style, write_error, write_success, write_warning};

/// How many leading bytes are inspected when classifying a file.
const SNIFF_LEN: u64 = 512;

/// Prints a file verbatim.
pub fn show(path: &str, out: &mut (dyn Write + Send)) -> Result<()> {
    match fs::read(path) {
        Ok(content) => {
            out.write_all(&content)?;
            writeln!(out)?;
        }
        Err(e) => write_error(out, format!("Failed to read {path}: {e}"))?,
    }
    Ok(())
}

/// Creates `path` from the template matching its extension.
///
/// Never overwrites: an existing path is reported and left alone.
pub fn create(path: &str, out: &mut (dyn Write + Send)) -> Result<()> {
    if fs::symlink_metadata(path).is_ok() {
        write_error(out, format!("File already exists: {}", Style::path(path)))?;
        return Ok(());
    }

    let result = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .and_then(|mut file| file.write_all(template_for(path).as_bytes()));

    match result {
        Ok(()) => write_success(out, format!("File created: {}", Style::path(path)))?,
        Err(e) => write_error(out, format!("Failed to create {path}: {e}"))?,
    }
    Ok(())
}

/// Returns `true` if the first 512 bytes of `path` contain no NUL byte.
pub fn is_text_file(path: &Path) -> io::Result<bool> {
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;
    Ok(!head.contains(&0))
}

/// Tracks a text file, or every text file directly inside a directory.
///
/// Binary files, subdirectories and unreadable files are skipped silently.
pub fn add(path: &str, state: &mut SessionState, out: &mut (dyn Write + Send)) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            write_error(out, format!("Cannot access {path}: {e}"))?;
            return Ok(());
        }
    };

    if !metadata.is_dir() {
        if is_text_file(Path::new(path)).unwrap_or(false) {
            track(path.to_string(), state, out)?;
        }
        return Ok(());
    }

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            write_error(out, format!("Failed to read directory {path}: {e}"))?;
            return Ok(());
        }
    };

    let mut files: Vec<_> = entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| !t.is_dir()))
        .map(|entry| entry.path())
        .collect();
    files.sort();

    for file in files {
        match is_text_file(&file) {
            Ok(true) => track(file.to_string_lossy().into_owned(), state, out)?,
            Ok(false) => {}
            Err(e) => tracing::debug!(path = %file.display(), "skipping unreadable file: {e}"),
        }
    }
    Ok(())
}

fn track(path: String, state: &mut SessionState, out: &mut (dyn Write + Send)) -> Result<()> {
    write_success(out, format!("Added file: {}", Style::path(&path)))?;
    state.track_file(path);
    Ok(())
}

/// Snapshots `path` for `/undo` before an edit.
///
/// An unreadable file only produces a warning; the edit is still announced.
pub fn capture_for_edit(
    path: &str,
    state: &mut SessionState,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    match fs::read(path) {
        Ok(content) => state.capture_snapshot(path, content),
        Err(e) => write_warning(out, format!("No undo snapshot for {path}: {e}"))?,
    }
    writeln!(out, "Editing file: {}", Style::path(path))?;
    Ok(())
}

/// Restores `path` from its snapshot and consumes the snapshot.
///
/// With the diff toggle on, shows what the restore changed in `style`. The
/// diff is skipped when either side is not UTF-8 text.
pub fn undo(
    path: &str,
    state: &mut SessionState,
    style: DiffStyle,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    let Some(snapshot) = state.take_snapshot(path) else {
        writeln!(out, "No undo history for {}", Style::path(path))?;
        return Ok(());
    };

    let current = if state.diff_enabled() {
        fs::read(path).ok()
    } else {
        None
    };

    if let Err(e) = fs::write(path, &snapshot) {
        write_error(out, format!("Failed to restore {path}: {e}"))?;
        return Ok(());
    }

    write_success(out, format!("Undone changes for {}", Style::path(path)))?;
    if let Some(current) = current
        && current != snapshot
        && let (Ok(before), Ok(after)) =
            (std::str::from_utf8(&current), std::str::from_utf8(&snapshot))
    {
        out.write_all(render_diff(before, after, style).as_bytes())?;
    }
    Ok(())
}
