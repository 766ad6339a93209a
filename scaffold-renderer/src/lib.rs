//! # scaffold-renderer
//!
//! Tera-based renderer that turns a template directory plus answers into a
//! rendered file tree.
//!
//! ## Template layout
//!
//! ```text
//! <template>/
//!   template.yaml     name, description, variables, copy_without_render
//!   project/          tree to render; paths and file bodies are Tera templates
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use scaffold_renderer::{render_tree, RenderContext, TemplateSpec};
//!
//! fn render(template: &Path, out: &Path) {
//!     if let Ok(spec) = TemplateSpec::load(template) {
//!         let ctx = RenderContext::new(&spec, spec.default_answers());
//!         if let Ok(summary) = render_tree(template, out, &spec, &ctx) {
//!             println!("{} files rendered", summary.files.len());
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod spec;

pub use context::RenderContext;
pub use engine::{render_tree, RenderSummary};
pub use error::RenderError;
pub use spec::{discover_templates, TemplateSpec, TemplateSummary, VariableSpec};
