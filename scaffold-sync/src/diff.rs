//! Preview of what `generate` would change, as unified diffs.

use std::io::ErrorKind;
use std::path::Path;

use similar::TextDiff;

use scaffold_core::types::FileClass;
use scaffold_renderer::{RenderContext, TemplateSpec};

use crate::error::{io_err, FsOp, SyncError};
use crate::hasher::{build_manifest, hash_file};
use crate::manifest_store;
use crate::pipeline::stage;

/// How a previewed file would change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Added,
    Changed,
    /// Stale and untouched; the next run deletes it.
    Deleted,
}

/// A single previewed file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    pub kind: DiffKind,
    pub unified_diff: String,
}

/// Render the template and compare it to `dest` without touching `dest`.
///
/// Files whose content already matches produce no entry. Sorted by path.
pub fn preview(
    template_dir: &Path,
    dest: &Path,
    spec: &TemplateSpec,
    ctx: &RenderContext,
) -> Result<Vec<FileDiff>, SyncError> {
    let (staging, _) = stage(template_dir, spec, ctx)?;
    let mut generated = build_manifest(staging.path())?;
    generated.remove(manifest_store::SIDECAR_NAME);

    let mut diffs = Vec::new();
    for rel in generated.keys() {
        let rendered = read(&staging.path().join(rel))?.unwrap_or_default();
        let (kind, existing) = match read(&dest.join(rel))? {
            Some(existing) if existing == rendered => continue,
            Some(existing) => (DiffKind::Changed, existing),
            None => (DiffKind::Added, Vec::new()),
        };
        diffs.push(FileDiff {
            path: rel.clone(),
            kind,
            unified_diff: unified(rel, &existing, &rendered),
        });
    }

    if let Some(existing) = manifest_store::load(dest)? {
        for (rel, recorded) in existing.iter().filter(|(k, _)| !generated.contains_key(*k)) {
            let path = dest.join(rel);
            let current = match hash_file(&path) {
                Ok(hash) => hash,
                Err(SyncError::NotFound { .. }) => continue,
                Err(e) => return Err(e),
            };
            if FileClass::classify_stale(Some(&current), recorded) != FileClass::StaleUnchanged {
                continue;
            }
            let old = read(&path)?.unwrap_or_default();
            diffs.push(FileDiff {
                path: rel.clone(),
                kind: DiffKind::Deleted,
                unified_diff: unified(rel, &old, &[]),
            });
        }
    }

    diffs.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(diffs)
}

fn unified(rel: &str, old: &[u8], new: &[u8]) -> String {
    let old_header = format!("a/{rel}");
    let new_header = format!("b/{rel}");
    match (std::str::from_utf8(old), std::str::from_utf8(new)) {
        (Ok(old), Ok(new)) => TextDiff::from_lines(old, new)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string(),
        _ => format!("Binary files {old_header} and {new_header} differ\n"),
    }
}

fn read(path: &Path) -> Result<Option<Vec<u8>>, SyncError> {
    if path.is_dir() {
        return Ok(None);
    }
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(FsOp::Read, path, err)),
    }
}
