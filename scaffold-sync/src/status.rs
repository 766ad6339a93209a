//! Destination status: how the files tracked by the manifest compare with
//! what is on disk now.
//!
//! Precedence of the overall signal:
//! 1. `NeverGenerated` (no sidecar)
//! 2. `Missing` (a tracked file is gone)
//! 3. `Modified` (a tracked file's content changed)
//! 4. `Current`

use std::path::Path;
use std::time::{Duration, SystemTime};

use serde::Serialize;

use scaffold_core::types::FileClass;

use crate::error::SyncError;
use crate::hasher::hash_file;
use crate::manifest_store;

/// State of one tracked file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Current,
    Modified,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedFile {
    pub path: String,
    pub status: FileStatus,
}

/// Result of [`check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StatusReport {
    /// `dest` has no sidecar.
    NeverGenerated,
    Generated {
        /// Every tracked file, sorted by path.
        files: Vec<TrackedFile>,
        /// Modification time of the sidecar.
        #[serde(skip)]
        last_generated: Option<SystemTime>,
    },
}

/// Overall signal derived from a [`StatusReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSignal {
    NeverGenerated,
    Missing,
    Modified,
    Current,
}

impl StatusReport {
    pub fn signal(&self) -> StatusSignal {
        let StatusReport::Generated { files, .. } = self else {
            return StatusSignal::NeverGenerated;
        };
        if files.iter().any(|f| f.status == FileStatus::Missing) {
            StatusSignal::Missing
        } else if files.iter().any(|f| f.status == FileStatus::Modified) {
            StatusSignal::Modified
        } else {
            StatusSignal::Current
        }
    }

    /// Tracked files in the given state.
    pub fn files_with(&self, status: FileStatus) -> Vec<&str> {
        match self {
            StatusReport::NeverGenerated => Vec::new(),
            StatusReport::Generated { files, .. } => files
                .iter()
                .filter(|f| f.status == status)
                .map(|f| f.path.as_str())
                .collect(),
        }
    }
}

/// Compare every file the manifest under `dest` tracks with its recorded
/// fingerprint. Files the manifest does not track are ignored.
pub fn check(dest: &Path) -> Result<StatusReport, SyncError> {
    let Some(manifest) = manifest_store::load(dest)? else {
        return Ok(StatusReport::NeverGenerated);
    };

    let mut files = Vec::with_capacity(manifest.len());
    for (rel, recorded) in &manifest {
        let current = match hash_file(&dest.join(rel)) {
            Ok(hash) => Some(hash),
            Err(SyncError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };
        let status = match (&current, FileClass::classify_stale(current.as_ref(), recorded)) {
            (None, _) => FileStatus::Missing,
            (Some(_), FileClass::StaleUnchanged) => FileStatus::Current,
            (Some(_), _) => FileStatus::Modified,
        };
        files.push(TrackedFile {
            path: rel.clone(),
            status,
        });
    }

    let sidecar = manifest_store::sidecar_path(dest);
    let last_generated = std::fs::metadata(&sidecar).and_then(|m| m.modified()).ok();

    Ok(StatusReport::Generated {
        files,
        last_generated,
    })
}

/// Format age from a filesystem timestamp, e.g. `"5m"`.
pub fn format_system_time_age(timestamp: SystemTime) -> String {
    let age = SystemTime::now()
        .duration_since(timestamp)
        .unwrap_or_default();
    format_duration(age)
}

fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 60 * 60 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 60 * 60 * 24 {
        return format!("{}h", seconds / (60 * 60));
    }
    format!("{}d", seconds / (60 * 60 * 24))
}
