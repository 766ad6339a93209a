//! Render context: answers plus renderer built-ins.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::spec::TemplateSpec;

/// Values a template can reference.
///
/// Answers are exposed at the top level (`{{ project_name }}`); built-ins live
/// under `scaffold` (`{{ scaffold.year }}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderContext {
    /// `(variable, value)` in declaration order.
    pub answers: Vec<(String, String)>,
    pub scaffold: MetaCtx,
}

/// Built-in values under the `scaffold` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaCtx {
    pub template: String,
    pub version: String,
    pub year: i32,
}

impl RenderContext {
    /// Build a context for `spec` from resolved answers.
    pub fn new(spec: &TemplateSpec, answers: Vec<(String, String)>) -> Self {
        RenderContext {
            answers,
            scaffold: MetaCtx {
                template: spec.name.0.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                year: Utc::now().year(),
            },
        }
    }

    /// Look up an answer by variable name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert into a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> tera::Context {
        let mut ctx = tera::Context::new();
        for (name, value) in &self.answers {
            ctx.insert(name.as_str(), value);
        }
        ctx.insert("scaffold", &self.scaffold);
        ctx
    }
}
