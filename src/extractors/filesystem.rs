//! Filesystem creation time, the fallback when a document declares none.
//!
//! Where the host records a birth time (Windows, macOS, most Linux
//! filesystems via statx) it is used. Otherwise the inode change time on Unix
//! or the last write time elsewhere stands in for it.

use crate::date::format_timestamp;
use crate::error::{Error, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;
use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

/// Shown when no timestamp could be read.
pub const UNAVAILABLE: &str = "N/A";

/// A file timestamp in local time, or the marker that there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilesystemDate {
    /// Timestamp read from the host
    Available(NaiveDateTime),
    /// Probe failed
    Unavailable,
}

impl FilesystemDate {
    /// The timestamp, if one was read.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        match self {
            FilesystemDate::Available(instant) => Some(*instant),
            FilesystemDate::Unavailable => None,
        }
    }

    /// Whether a timestamp was read.
    pub fn is_available(&self) -> bool {
        matches!(self, FilesystemDate::Available(_))
    }

    /// Display form: canonical timestamp or [`UNAVAILABLE`].
    pub fn render(&self) -> String {
        match self {
            FilesystemDate::Available(instant) => format_timestamp(instant),
            FilesystemDate::Unavailable => UNAVAILABLE.to_string(),
        }
    }
}

/// Probe the best available creation timestamp of `path`. Never fails.
pub fn probe(path: &Path) -> FilesystemDate {
    match creation_time(path) {
        Ok(time) => FilesystemDate::Available(DateTime::<Local>::from(time).naive_local()),
        Err(e) => {
            log::debug!("{}: {}", path.display(), e);
            FilesystemDate::Unavailable
        },
    }
}

fn creation_time(path: &Path) -> Result<SystemTime> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| Error::FilesystemProbeUnavailable(e.to_string()))?;
    metadata
        .created()
        .or_else(|_| change_time(&metadata))
        .map_err(|e| Error::FilesystemProbeUnavailable(e.to_string()))
}

#[cfg(unix)]
fn change_time(metadata: &Metadata) -> std::io::Result<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::Duration;

    let secs = metadata.ctime();
    let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
    let offset = Duration::new(secs.unsigned_abs(), nanos);
    if secs >= 0 {
        Ok(SystemTime::UNIX_EPOCH + offset)
    } else {
        Ok(SystemTime::UNIX_EPOCH - offset)
    }
}

#[cfg(not(unix))]
fn change_time(metadata: &Metadata) -> std::io::Result<SystemTime> {
    metadata.modified()
}
