//! Stale-file pruning.
//!
//! A path is stale when the previous manifest recorded it but the template no
//! longer produces it. Stale files are removed only while they still hold the
//! recorded content; anything the user touched stays on disk.

use std::path::Path;

use scaffold_core::types::{FileClass, Manifest};

use crate::error::{io_err, FsOp, SyncError};
use crate::hasher::hash_file;
use crate::manifest_store::is_contained_key;

/// Delete stale, unmodified files under `dest`.
///
/// Returns the deleted paths, sorted. Paths already gone from `dest` are
/// skipped silently. Keys that would resolve outside `dest` are never touched.
pub fn prune(generated: &Manifest, existing: &Manifest, dest: &Path) -> Result<Vec<String>, SyncError> {
    let mut deleted = Vec::new();
    for (rel, recorded) in existing {
        if generated.contains_key(rel) {
            continue;
        }
        if !is_contained_key(rel) {
            tracing::warn!("ignoring manifest entry outside the destination: {rel}");
            continue;
        }
        let path = dest.join(rel);
        let current = match hash_file(&path) {
            Ok(hash) => Some(hash),
            Err(SyncError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };
        match FileClass::classify_stale(current.as_ref(), recorded) {
            FileClass::StaleUnchanged => {
                remove_file(&path)?;
                tracing::info!("pruned: {rel}");
                deleted.push(rel.clone());
            }
            _ if current.is_none() => tracing::debug!("stale path already gone: {rel}"),
            _ => tracing::info!("keeping modified stale file: {rel}"),
        }
    }
    deleted.sort();
    Ok(deleted)
}

/// Remove `path`; a file that vanished in the meantime counts as removed.
fn remove_file(path: &Path) -> Result<(), SyncError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_err(FsOp::Delete, path, e)),
    }
}
