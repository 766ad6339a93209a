//! Error types for scaffold-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template loading and rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// A template file failed to render; the path names the offending file.
    #[error("failed to render {path}: {source}")]
    Template {
        path: String,
        #[source]
        source: tera::Error,
    },

    /// `template.yaml` is missing from the template directory.
    #[error("no template.yaml found in {path}")]
    SpecNotFound { path: PathBuf },

    /// `template.yaml` exists but is not valid.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `template.yaml` parsed but describes an unusable template.
    #[error("invalid template spec: {0}")]
    InvalidSpec(String),

    /// A `copy_without_render` entry is not a valid glob.
    #[error("invalid copy_without_render pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Filesystem error while reading templates or writing output.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

/// Convenience constructor for [`RenderError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
