//! Input discovery: turns the input path into a stream of jobs.
//!
//! ## Modes
//!
//! - **Single file**: the path itself is the only job. No extension check;
//!   a non-image file simply fails to decode later.
//! - **Directory**: direct children only (no recursion). Subdirectories are
//!   skipped and only names ending in `.png`, `.jpg` or `.jpeg` (exact case)
//!   become jobs, in whatever order the filesystem lists them.
//!
//! Directory entries are streamed into a bounded channel as they are read,
//! so a huge directory never sits in memory as a job list.

use crossbeam::channel::Sender;
use std::fs::{self, ReadDir};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions (with dot, case-sensitive) accepted in directory mode.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),
    #[error("Failed to access input {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read input directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single unit of work: the input file to process. Immutable once queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
}

/// Resolved input root.
#[derive(Debug)]
pub enum InputSource {
    /// One file, processed regardless of extension.
    Single(Job),
    /// An opened directory whose entries are still to be read.
    Directory { root: PathBuf, entries: ReadDir },
}

/// Classify `path` and, for directories, open them for listing.
///
/// Every failure is fatal for the run: a missing path, a path that can't be
/// stat'ed, or a directory that can't be opened.
pub fn resolve_input(path: &Path) -> Result<InputSource, ScanError> {
    let metadata = fs::metadata(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ScanError::InputNotFound(path.to_path_buf()),
        _ => ScanError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;
    if !metadata.is_dir() {
        return Ok(InputSource::Single(Job {
            input: path.to_path_buf(),
        }));
    }
    let entries = fs::read_dir(path).map_err(|source| ScanError::ReadDir {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(InputSource::Directory {
        root: path.to_path_buf(),
        entries,
    })
}

/// Whether `path` ends in one of [`SUPPORTED_EXTENSIONS`] (case-sensitive).
///
/// Compares raw `OsStr`s, so the rest of the name need not be UTF-8.
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        SUPPORTED_EXTENSIONS
            .iter()
            .any(|supported| supported.strip_prefix('.').is_some_and(|s| ext == s))
    })
}

/// Lazily yield a job per eligible directory entry.
///
/// Entries that can't be read are logged and skipped.
pub fn directory_jobs(root: &Path, entries: ReadDir) -> impl Iterator<Item = Job> + '_ {
    entries.filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %root.display(), error = %e, "skipping unreadable entry");
                return None;
            }
        };
        // file_type() doesn't follow symlinks; a link to a file counts as a file.
        let is_dir = entry
            .file_type()
            .map(|t| t.is_dir() || (t.is_symlink() && entry.path().is_dir()))
            .unwrap_or(false);
        if is_dir {
            return None;
        }
        let path = entry.path();
        has_supported_extension(&path).then_some(Job { input: path })
    })
}

/// Producer loop: push every eligible entry into `jobs`, then close the queue.
///
/// Blocks while the queue is full. Returns the number of jobs queued; stops
/// early if every receiver has gone away.
pub fn queue_directory_jobs(root: &Path, entries: ReadDir, jobs: Sender<Job>) -> usize {
    let mut queued = 0;
    for job in directory_jobs(root, entries) {
        tracing::debug!(input = %job.input.display(), "queueing job");
        if jobs.send(job).is_err() {
            tracing::warn!("job queue closed early; stopping producer");
            break;
        }
        queued += 1;
    }
    // Dropping the sender closes the queue.
    drop(jobs);
    queued
}
