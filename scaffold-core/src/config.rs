//! User configuration and replay answers.
//!
//! # Storage layout
//!
//! ```text
//! ~/.scaffold/
//!   config.yaml               (optional: default_context for every template)
//!   replay/
//!     <template_name>.yaml    (answers from the last generation: mode 0600)
//! ```
//!
//! # API pattern
//!
//! Every function touching `~/.scaffold` has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::TemplateName;

/// Variable name → answer.
pub type Answers = BTreeMap<String, String>;

/// Contents of `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Values that override template defaults for every template.
    #[serde(default)]
    pub default_context: Answers,
}

/// Contents of `replay/<template_name>.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayFile {
    pub saved_at: DateTime<Utc>,
    pub context: Answers,
}

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.scaffold/`: pure, no I/O.
pub fn scaffold_dir_at(home: &Path) -> PathBuf {
    home.join(".scaffold")
}

/// `<home>/.scaffold/config.yaml`: pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    scaffold_dir_at(home).join("config.yaml")
}

/// `<home>/.scaffold/replay/<template>.yaml`: pure, no I/O.
pub fn replay_path_at(home: &Path, template: &TemplateName) -> PathBuf {
    scaffold_dir_at(home)
        .join("replay")
        .join(format!("{}.yaml", template.0))
}

// ---------------------------------------------------------------------------
// 2. User config
// ---------------------------------------------------------------------------

/// Load the user config.
///
/// With `explicit = Some(path)` the file must exist
/// (`ConfigError::ConfigNotFound` otherwise). Without it, the default
/// `<home>/.scaffold/config.yaml` is read when present and an empty config is
/// returned when it is not.
pub fn load_user_config_at(
    home: &Path,
    explicit: Option<&Path>,
) -> Result<UserConfig, ConfigError> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            path.to_path_buf()
        }
        None => {
            let path = config_path_at(home);
            if !path.exists() {
                return Ok(UserConfig::default());
            }
            path
        }
    };
    let contents = std::fs::read_to_string(&path)?;
    if contents.trim().is_empty() {
        return Ok(UserConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// `load_user_config_at` convenience wrapper.
pub fn load_user_config(explicit: Option<&Path>) -> Result<UserConfig, ConfigError> {
    load_user_config_at(&home()?, explicit)
}

// ---------------------------------------------------------------------------
// 3. Replay answers
// ---------------------------------------------------------------------------

/// Load the answers saved by the last generation of `template`.
///
/// Returns `ConfigError::ReplayNotFound` if nothing was saved yet.
pub fn load_replay_at(home: &Path, template: &TemplateName) -> Result<ReplayFile, ConfigError> {
    let path = replay_path_at(home, template);
    if !path.exists() {
        return Err(ConfigError::ReplayNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// `load_replay_at` convenience wrapper.
pub fn load_replay(template: &TemplateName) -> Result<ReplayFile, ConfigError> {
    load_replay_at(&home()?, template)
}

/// Atomically save the answers used for `template`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_replay_at(
    home: &Path,
    template: &TemplateName,
    context: &Answers,
) -> Result<ReplayFile, ConfigError> {
    let path = replay_path_at(home, template);
    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| scaffold_dir_at(home));
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }

    let replay = ReplayFile {
        saved_at: Utc::now(),
        context: context.clone(),
    };
    let tmp_path = path.with_file_name(format!("{}.yaml.tmp", template.0));
    let yaml = serde_yaml::to_string(&replay)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(replay)
}

/// `save_replay_at` convenience wrapper.
pub fn save_replay(template: &TemplateName, context: &Answers) -> Result<ReplayFile, ConfigError> {
    save_replay_at(&home()?, template, context)
}

// ---------------------------------------------------------------------------
// 4. Variable resolution
// ---------------------------------------------------------------------------

/// Layer answer sources for a template's variables.
///
/// Precedence, lowest to highest: template `defaults`, the user config's
/// `default_context`, then `replay` answers. Only variables named in
/// `defaults` are kept, in the same key order.
pub fn resolve_answers(
    defaults: &[(String, String)],
    user: &UserConfig,
    replay: Option<&Answers>,
) -> Vec<(String, String)> {
    defaults
        .iter()
        .map(|(name, default)| {
            let value = replay
                .and_then(|r| r.get(name))
                .or_else(|| user.default_context.get(name))
                .unwrap_or(default);
            (name.clone(), value.clone())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_home() -> TempDir {
        TempDir::new().expect("tempdir")
    }

    fn tpl() -> TemplateName {
        TemplateName::from("rust-lib")
    }

    #[test]
    fn replay_path_is_correct() {
        let home = make_home();
        let path = replay_path_at(home.path(), &tpl());
        assert!(path.ends_with(".scaffold/replay/rust-lib.yaml"));
    }

    #[test]
    fn missing_default_config_is_empty() {
        let home = make_home();
        let config = load_user_config_at(home.path(), None).expect("load");
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let home = make_home();
        let missing = home.path().join("nope.yaml");
        let err = load_user_config_at(home.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigNotFound { .. }));
    }

    #[test]
    fn replay_roundtrip() {
        let home = make_home();
        let mut answers = Answers::new();
        answers.insert("project_name".into(), "demo".into());
        save_replay_at(home.path(), &tpl(), &answers).expect("save");
        let loaded = load_replay_at(home.path(), &tpl()).expect("load");
        assert_eq!(loaded.context, answers);
    }

    #[test]
    fn replay_save_cleans_up_tmp() {
        let home = make_home();
        save_replay_at(home.path(), &tpl(), &Answers::new()).expect("save");
        let tmp = replay_path_at(home.path(), &tpl()).with_file_name("rust-lib.yaml.tmp");
        assert!(!tmp.exists(), ".tmp must be gone after successful save");
    }

    #[test]
    fn resolve_prefers_replay_then_user_then_default() {
        let defaults = vec![
            ("a".to_string(), "default-a".to_string()),
            ("b".to_string(), "default-b".to_string()),
            ("c".to_string(), "default-c".to_string()),
        ];
        let mut user = UserConfig::default();
        user.default_context.insert("b".into(), "user-b".into());
        user.default_context.insert("c".into(), "user-c".into());
        user.default_context.insert("unrelated".into(), "x".into());
        let mut replay = Answers::new();
        replay.insert("c".into(), "replay-c".into());

        let resolved = resolve_answers(&defaults, &user, Some(&replay));
        assert_eq!(
            resolved,
            vec![
                ("a".to_string(), "default-a".to_string()),
                ("b".to_string(), "user-b".to_string()),
                ("c".to_string(), "replay-c".to_string()),
            ]
        );
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(ConfigError::HomeNotFound.to_string().contains("home directory"));
    }
}
