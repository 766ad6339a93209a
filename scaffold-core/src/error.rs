//! Error types for scaffold-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from configuration and replay operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, disk full, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`: cannot locate `~/.scaffold/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// A config file named explicitly on the command line does not exist.
    #[error("config file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// `--replay` was requested but no answers were saved for the template.
    #[error("no replay answers saved at {path}")]
    ReplayNotFound { path: PathBuf },
}
