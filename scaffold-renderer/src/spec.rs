//! `template.yaml`: template metadata, variables, and discovery.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use scaffold_core::types::TemplateName;

use crate::error::{io_err, RenderError};

/// File name of the template descriptor.
pub const SPEC_FILE: &str = "template.yaml";

/// Subdirectory holding the tree to render.
pub const PROJECT_DIR: &str = "project";

/// Variable names the renderer injects itself.
const RESERVED_VARIABLES: &[&str] = &["scaffold"];

/// Parsed `template.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub name: TemplateName,
    #[serde(default)]
    pub description: Option<String>,
    /// Prompted in declaration order.
    #[serde(default)]
    pub variables: Vec<VariableSpec>,
    /// Glob patterns (relative to `project/`) copied verbatim.
    #[serde(default)]
    pub copy_without_render: Vec<String>,
}

/// One template variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    #[serde(default, deserialize_with = "scalar_to_string")]
    pub default: String,
    /// Question shown when prompting; falls back to `name`.
    #[serde(default)]
    pub prompt: Option<String>,
}

impl VariableSpec {
    pub fn prompt_text(&self) -> &str {
        self.prompt.as_deref().unwrap_or(&self.name)
    }
}

/// A template found by [`discover_templates`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub name: TemplateName,
    pub description: Option<String>,
    pub path: PathBuf,
}

impl TemplateSpec {
    /// Load and validate `<template_dir>/template.yaml`.
    pub fn load(template_dir: &Path) -> Result<Self, RenderError> {
        let path = template_dir.join(SPEC_FILE);
        if !path.is_file() {
            return Err(RenderError::SpecNotFound {
                path: template_dir.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let spec: TemplateSpec =
            serde_yaml::from_str(&contents).map_err(|e| RenderError::Parse { path, source: e })?;
        spec.validate()?;

        let project = template_dir.join(PROJECT_DIR);
        if !project.is_dir() {
            return Err(RenderError::InvalidSpec(format!(
                "template '{}' has no {PROJECT_DIR}/ directory",
                spec.name
            )));
        }
        Ok(spec)
    }

    /// `(name, default)` pairs in declaration order.
    pub fn default_answers(&self) -> Vec<(String, String)> {
        self.variables
            .iter()
            .map(|v| (v.name.clone(), v.default.clone()))
            .collect()
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.name.0.trim().is_empty() {
            return Err(RenderError::InvalidSpec("template name is empty".to_string()));
        }
        if self.name.0.contains(['/', '\\']) {
            return Err(RenderError::InvalidSpec(format!(
                "template name '{}' must not contain path separators",
                self.name
            )));
        }
        let mut seen = std::collections::BTreeSet::new();
        for var in &self.variables {
            if RESERVED_VARIABLES.contains(&var.name.as_str()) {
                return Err(RenderError::InvalidSpec(format!(
                    "variable name '{}' is reserved",
                    var.name
                )));
            }
            if !seen.insert(var.name.as_str()) {
                return Err(RenderError::InvalidSpec(format!(
                    "variable '{}' declared twice",
                    var.name
                )));
            }
        }
        Ok(())
    }
}

/// List every direct subdirectory of `root` that holds a `template.yaml`.
///
/// Subdirectories whose descriptor fails to parse are skipped. Sorted by name.
pub fn discover_templates(root: &Path) -> Result<Vec<TemplateSummary>, RenderError> {
    let entries = std::fs::read_dir(root).map_err(|e| io_err(root, e))?;
    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(root, e))?;
        let path = entry.path();
        if !path.join(SPEC_FILE).is_file() {
            continue;
        }
        match TemplateSpec::load(&path) {
            Ok(spec) => found.push(TemplateSummary {
                name: spec.name,
                description: spec.description,
                path,
            }),
            Err(_) => continue,
        }
    }
    found.sort_by(|a, b| a.name.0.cmp(&b.name.0));
    Ok(found)
}

fn scalar_to_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Bool(bool),
        Int(i64),
        Float(f64),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Str(s) => s,
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_template(root: &Path, dir: &str, yaml: &str) -> PathBuf {
        let path = root.join(dir);
        fs::create_dir_all(path.join(PROJECT_DIR)).unwrap();
        fs::write(path.join(SPEC_FILE), yaml).unwrap();
        path
    }

    #[test]
    fn loads_variables_in_order_with_scalar_defaults() {
        let tmp = TempDir::new().unwrap();
        let dir = write_template(
            tmp.path(),
            "lib",
            "name: rust-lib\nvariables:\n  - name: project_name\n    default: demo\n  - name: year\n    default: 2024\n  - name: ci\n    default: true\n",
        );
        let spec = TemplateSpec::load(&dir).unwrap();
        assert_eq!(
            spec.default_answers(),
            vec![
                ("project_name".to_string(), "demo".to_string()),
                ("year".to_string(), "2024".to_string()),
                ("ci".to_string(), "true".to_string()),
            ]
        );
        assert_eq!(spec.variables[0].prompt_text(), "project_name");
    }

    #[test]
    fn missing_spec_is_reported() {
        let tmp = TempDir::new().unwrap();
        let err = TemplateSpec::load(tmp.path()).unwrap_err();
        assert!(matches!(err, RenderError::SpecNotFound { .. }));
    }

    #[test]
    fn reserved_variable_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let dir = write_template(tmp.path(), "bad", "name: bad\nvariables:\n  - name: scaffold\n");
        let err = TemplateSpec::load(&dir).unwrap_err();
        assert!(matches!(err, RenderError::InvalidSpec(_)), "got: {err}");
    }

    #[test]
    fn duplicate_variable_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let dir = write_template(
            tmp.path(),
            "dup",
            "name: dup\nvariables:\n  - name: a\n  - name: a\n",
        );
        assert!(matches!(
            TemplateSpec::load(&dir).unwrap_err(),
            RenderError::InvalidSpec(_)
        ));
    }

    #[test]
    fn missing_project_dir_is_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(SPEC_FILE), "name: empty\n").unwrap();
        assert!(matches!(
            TemplateSpec::load(tmp.path()).unwrap_err(),
            RenderError::InvalidSpec(_)
        ));
    }

    #[test]
    fn discovery_is_sorted_and_skips_non_templates() {
        let tmp = TempDir::new().unwrap();
        write_template(tmp.path(), "z-dir", "name: alpha\n");
        write_template(tmp.path(), "a-dir", "name: beta\ndescription: second\n");
        fs::create_dir_all(tmp.path().join("not-a-template")).unwrap();
        write_template(tmp.path(), "broken", ": : :\n");

        let found = discover_templates(tmp.path()).unwrap();
        let names: Vec<&str> = found.iter().map(|t| t.name.0.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        assert_eq!(found[1].description.as_deref(), Some("second"));
    }
}
