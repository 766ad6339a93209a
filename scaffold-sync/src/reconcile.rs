//! Reconciliation of a freshly generated tree into the destination.
//!
//! ## `reconcile` protocol
//!
//! 1. Fingerprint the generated tree (`src`).
//! 2. Load the previous manifest from `dest`, if any.
//! 3. Prune stale files the user never touched.
//! 4. Start the next manifest from the generated fingerprints.
//! 5. Classify every generated path; ask before replacing user edits. A
//!    refused overwrite copies the user's file back into `src` and keeps its
//!    old baseline in the manifest; an untracked path stays untracked.
//! 6. Save the manifest (read-only).
//! 7. Copy `src` over `dest`, then remove `src`.

use std::collections::BTreeSet;
use std::path::Path;

use walkdir::WalkDir;

use scaffold_core::types::{ChangeReport, FileClass};

use crate::error::{io_err, FsOp, SyncError};
use crate::hasher::{build_manifest, hash_file, to_posix_key, walk_err};
use crate::manifest_store::{self, SIDECAR_NAME};
use crate::prune::prune;

/// Suffix of the temporary sibling used while replacing a file.
const TMP_SUFFIX: &str = ".scaffold.tmp";

/// Merge the generated tree at `src` into `dest`.
///
/// `confirm` is called once per path (destination-relative, `/`-separated)
/// whose destination content diverges from both the generated content and the
/// recorded baseline; `Ok(true)` overwrites the user's copy. An `Err` from
/// `confirm` aborts the run before anything is saved or copied.
///
/// `src` is consumed: it is removed once its contents are in `dest`.
pub fn reconcile<F>(src: &Path, dest: &Path, mut confirm: F) -> Result<ChangeReport, SyncError>
where
    F: FnMut(&str) -> Result<bool, SyncError>,
{
    if !dest.is_dir() {
        return Err(SyncError::NotFound {
            path: dest.to_path_buf(),
        });
    }

    // Step 1: fingerprint the generated tree.
    let mut generated = build_manifest(src)?;
    generated.remove(SIDECAR_NAME);

    // Step 2: previous manifest.
    let existing = manifest_store::load(dest)?;

    // Step 3: prune.
    let mut report = ChangeReport::default();
    if let Some(existing) = &existing {
        report.deleted = prune(&generated, existing, dest)?;
    }
    let existing = existing.unwrap_or_default();

    // Step 4: stale entries are dropped whether or not prune deleted the file.
    let mut merged = generated.clone();

    // Step 5: classify.
    let mut identical = BTreeSet::new();
    for (rel, generated_hash) in &generated {
        let dest_path = dest.join(rel);
        let current = match hash_file(&dest_path) {
            Ok(hash) => Some(hash),
            Err(SyncError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };
        let recorded = existing.get(rel);

        match FileClass::classify_generated(generated_hash, current.as_ref(), recorded) {
            FileClass::New => report.added.push(rel.clone()),
            FileClass::TemplateOnlyChange => report.modified_template.push(rel.clone()),
            FileClass::UserModifiedConflict => {
                if confirm(rel)? {
                    tracing::info!("overwriting user changes: {rel}");
                    report.overwritten.push(rel.clone());
                } else {
                    tracing::info!("keeping user changes: {rel}");
                    copy_file(&dest_path, &src.join(rel))?;
                    identical.insert(rel.clone());
                    match recorded {
                        Some(recorded) => {
                            merged.insert(rel.clone(), recorded.clone());
                        }
                        // Stays untracked so the next run asks again.
                        None => {
                            merged.remove(rel);
                        }
                    }
                }
            }
            FileClass::Unchanged => {
                identical.insert(rel.clone());
            }
            // Never produced for a generated path.
            FileClass::StaleUnchanged | FileClass::StaleModified => {}
        }
    }

    // Step 6: persist.
    manifest_store::save(dest, &merged)?;

    // Step 7: copy and clean up.
    copy_tree(src, dest, &identical)?;
    std::fs::remove_dir_all(src).map_err(|e| io_err(FsOp::Delete, src, e))?;

    let report = report.into_sorted();
    tracing::info!(
        "reconciled {}: {} added, {} deleted, {} overwritten, {} updated",
        dest.display(),
        report.added.len(),
        report.deleted.len(),
        report.overwritten.len(),
        report.modified_template.len(),
    );
    Ok(report)
}

/// Copy every regular file of `src` into `dest`, creating parent directories.
///
/// The root-level sidecar and paths listed in `skip` (already identical in
/// `dest`) are not copied.
fn copy_tree(src: &Path, dest: &Path, skip: &BTreeSet<String>) -> Result<(), SyncError> {
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_err(src, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let key = to_posix_key(rel);
        if key == SIDECAR_NAME || skip.contains(&key) {
            continue;
        }
        copy_file(entry.path(), &dest.join(rel))?;
        tracing::debug!("wrote: {key}");
    }
    Ok(())
}

/// Replace `to` with a copy of `from` via a temporary sibling and rename.
///
/// Permission bits travel with the copy.
pub(crate) fn copy_file(from: &Path, to: &Path) -> Result<(), SyncError> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(FsOp::CreateDir, parent, e))?;
    }
    let mut tmp_name = to.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(TMP_SUFFIX);
    let tmp = to.with_file_name(tmp_name);

    std::fs::copy(from, &tmp).map_err(|e| io_err(FsOp::Copy, from, e))?;
    if let Err(e) = std::fs::rename(&tmp, to) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(FsOp::Rename, to, e));
    }
    Ok(())
}
