//! Error types for scaffold-sync.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use scaffold_renderer::RenderError;

/// The filesystem operation that failed, named in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    Hash,
    Read,
    Write,
    Copy,
    Rename,
    Delete,
    CreateDir,
    SetPermissions,
    Walk,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            FsOp::Hash => "hash",
            FsOp::Read => "read",
            FsOp::Write => "write",
            FsOp::Copy => "copy",
            FsOp::Rename => "rename",
            FsOp::Delete => "delete",
            FsOp::CreateDir => "create directory",
            FsOp::SetPermissions => "set permissions on",
            FsOp::Walk => "walk",
        };
        f.write_str(verb)
    }
}

/// All errors that can arise from reconciliation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A required file or directory does not exist.
    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    /// The manifest sidecar exists but cannot be parsed.
    #[error("malformed manifest at {path}: {source}")]
    MalformedManifest {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A sidecar key that is not a plain relative path inside the destination.
    #[error("malformed manifest at {path}: entry {key:?} points outside the destination")]
    InvalidManifestKey { path: PathBuf, key: String },

    /// Manifest serialization error (save path).
    #[error("manifest serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An I/O error, annotated with the attempted operation and path.
    #[error("failed to {op} {path}: {source}")]
    Io {
        op: FsOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Reading or writing the overwrite question failed.
    #[error("failed to ask about {path}: {source}")]
    Prompt {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Input ended while an overwrite question was pending.
    #[error("input closed while asking whether to overwrite {path}")]
    PromptClosed { path: String },
}

/// Convenience constructor for [`SyncError::Io`].
///
/// `NotFound` I/O errors become [`SyncError::NotFound`].
pub(crate) fn io_err(op: FsOp, path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    let path = path.into();
    if source.kind() == std::io::ErrorKind::NotFound {
        return SyncError::NotFound { path };
    }
    SyncError::Io { op, path, source }
}
