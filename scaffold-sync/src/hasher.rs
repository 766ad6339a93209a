//! Content fingerprints and manifest building.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use scaffold_core::types::{Fingerprint, Manifest};

use crate::error::{io_err, FsOp, SyncError};

/// Files are hashed in chunks of this many bytes.
const CHUNK_SIZE: usize = 8192;

/// SHA-256 fingerprint of a file's bytes, streamed in 8 KiB chunks.
///
/// Returns [`SyncError::NotFound`] if `path` is not a regular file.
pub fn hash_file(path: &Path) -> Result<Fingerprint, SyncError> {
    if !path.is_file() {
        return Err(SyncError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let mut file = File::open(path).map_err(|e| io_err(FsOp::Hash, path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).map_err(|e| io_err(FsOp::Hash, path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(Fingerprint(hex::encode(hasher.finalize())))
}

/// Fingerprint of an in-memory buffer; equal to [`hash_file`] of the same bytes.
pub fn hash_bytes(bytes: &[u8]) -> Fingerprint {
    Fingerprint(hex::encode(Sha256::digest(bytes)))
}

/// Fingerprint every regular file under `root`.
///
/// Keys are `/`-separated paths relative to `root`. Directories (empty or not)
/// contribute no entries.
pub fn build_manifest(root: &Path) -> Result<Manifest, SyncError> {
    if !root.is_dir() {
        return Err(SyncError::NotFound {
            path: root.to_path_buf(),
        });
    }
    let mut manifest = Manifest::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_err(root, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        manifest.insert(to_posix_key(rel), hash_file(entry.path())?);
    }
    tracing::debug!("hashed {} file(s) under {}", manifest.len(), root.display());
    Ok(manifest)
}

/// Join a relative path's components with `/`.
pub(crate) fn to_posix_key(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub(crate) fn walk_err(root: &Path, err: walkdir::Error) -> SyncError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
    io_err(FsOp::Walk, path, source)
}
