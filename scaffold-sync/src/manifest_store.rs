//! Manifest store: the YAML sidecar recording what the last run generated.
//!
//! Lives at `<dest>/.scaffold-manifest.yml`. The file is kept owner-read-only
//! between runs; [`save`] lifts the protection, replaces the file atomically
//! (`.tmp` + rename) and restores it.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use scaffold_core::types::{Fingerprint, Manifest};

use crate::error::{io_err, FsOp, SyncError};

/// File name of the sidecar, relative to the destination root.
pub const SIDECAR_NAME: &str = ".scaffold-manifest.yml";

const BANNER: &str = "\
# Written by scaffold after every generation. It records a fingerprint of
# each generated file so later runs can tell your edits apart from template
# changes. Do not edit or delete it.

";

/// `<dest>/.scaffold-manifest.yml`: pure, no I/O.
pub fn sidecar_path(dest: &Path) -> PathBuf {
    dest.join(SIDECAR_NAME)
}

/// `true` when `key` is a non-empty relative path of plain components, so
/// `dest.join(key)` stays under `dest`.
pub fn is_contained_key(key: &str) -> bool {
    let path = Path::new(key);
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Read the sidecar under `dest`.
///
/// Returns `Ok(None)` when it does not exist (first generation). An entry
/// naming the sidecar itself is dropped on load. Absolute keys and keys with
/// `..` are rejected with [`SyncError::InvalidManifestKey`].
pub fn load(dest: &Path) -> Result<Option<Manifest>, SyncError> {
    let path = sidecar_path(dest);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(FsOp::Read, &path, e))?;
    let has_body = contents
        .lines()
        .any(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'));
    let mut manifest: Manifest = if has_body {
        serde_yaml::from_str(&contents)
            .map_err(|e| SyncError::MalformedManifest { path: path.clone(), source: e })?
    } else {
        Manifest::new()
    };
    manifest.remove(SIDECAR_NAME);
    if let Some(key) = manifest.keys().find(|k| !is_contained_key(k)) {
        return Err(SyncError::InvalidManifestKey {
            path,
            key: key.clone(),
        });
    }
    Ok(Some(manifest))
}

/// Persist `manifest` as the sidecar under `dest` and leave it read-only.
pub fn save(dest: &Path, manifest: &Manifest) -> Result<(), SyncError> {
    let path = sidecar_path(dest);
    let entries: BTreeMap<&str, &Fingerprint> = manifest
        .iter()
        .filter(|(k, _)| k.as_str() != SIDECAR_NAME)
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    let yaml = serde_yaml::to_string(&entries)?;

    if path.exists() {
        set_write_protection(&path, false)?;
    }

    let tmp = path.with_file_name(format!("{SIDECAR_NAME}.tmp"));
    std::fs::write(&tmp, format!("{BANNER}{yaml}")).map_err(|e| io_err(FsOp::Write, &tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(FsOp::Rename, &path, e));
    }

    set_write_protection(&path, true)?;
    tracing::debug!("saved manifest with {} entries to {}", entries.len(), path.display());
    Ok(())
}

/// Clear (`read_only = true`) or set the owner-write permission of `path`.
#[cfg(unix)]
pub fn set_write_protection(path: &Path, read_only: bool) -> Result<(), SyncError> {
    use std::os::unix::fs::PermissionsExt;
    let meta = std::fs::metadata(path).map_err(|e| io_err(FsOp::SetPermissions, path, e))?;
    let mode = meta.permissions().mode();
    let mode = if read_only { mode & !0o200 } else { mode | 0o200 };
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .map_err(|e| io_err(FsOp::SetPermissions, path, e))
}
#[cfg(not(unix))]
pub fn set_write_protection(path: &Path, read_only: bool) -> Result<(), SyncError> {
    let meta = std::fs::metadata(path).map_err(|e| io_err(FsOp::SetPermissions, path, e))?;
    let mut perms = meta.permissions();
    perms.set_readonly(read_only);
    std::fs::set_permissions(path, perms).map_err(|e| io_err(FsOp::SetPermissions, path, e))
}

/// `true` when the owner may not write to `path`.
pub fn is_write_protected(path: &Path) -> Result<bool, SyncError> {
    let meta = std::fs::metadata(path).map_err(|e| io_err(FsOp::Read, path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Ok(meta.permissions().mode() & 0o200 == 0)
    }
    #[cfg(not(unix))]
    {
        Ok(meta.permissions().readonly())
    }
}
