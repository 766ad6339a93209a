//! Tera rendering engine: renders `<template>/project/` into an output tree.
//!
//! # Rules
//!
//! | Input                                   | Output                               |
//! |-----------------------------------------|--------------------------------------|
//! | path component with `{{ }}` / `{% %}`   | rendered; empty result skips subtree |
//! | UTF-8 file body                         | rendered, LF line endings            |
//! | non-UTF-8 body or `copy_without_render` | copied byte-for-byte                 |
//! | unix executable bits                    | preserved                            |

use std::path::{Component, Path, PathBuf};

use tera::Tera;

use crate::context::RenderContext;
use crate::error::{io_err, RenderError};
use crate::spec::{TemplateSpec, PROJECT_DIR};

/// What [`render_tree`] produced, as posix paths relative to the output dir.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub files: Vec<String>,
    /// Source paths excluded because a path component rendered empty.
    pub skipped: Vec<String>,
}

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

struct SourceFile {
    /// Posix path relative to `project/`; doubles as the Tera template name.
    name: String,
    source: PathBuf,
    output: PathBuf,
    body: Body,
}

enum Body {
    Text,
    Verbatim(Vec<u8>),
}

fn to_posix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn has_template_syntax(s: &str) -> bool {
    s.contains("{{") || s.contains("{%")
}

/// Render each component of `rel`; `Ok(None)` when one renders empty.
fn render_path(rel: &Path, ctx: &tera::Context) -> Result<Option<PathBuf>, RenderError> {
    let mut out = PathBuf::new();
    for component in rel.components() {
        let Component::Normal(part) = component else {
            continue;
        };
        let part = part.to_string_lossy();
        let rendered = if has_template_syntax(&part) {
            Tera::one_off(&part, ctx, false).map_err(|e| RenderError::Template {
                path: to_posix(rel),
                source: e,
            })?
        } else {
            part.into_owned()
        };
        let rendered = rendered.trim();
        if rendered.is_empty() {
            return Ok(None);
        }
        if rendered == "." || rendered == ".." || rendered.contains(['/', '\\']) {
            return Err(RenderError::InvalidSpec(format!(
                "path '{}' renders to unsafe component '{rendered}'",
                to_posix(rel)
            )));
        }
        out.push(rendered);
    }
    Ok(Some(out))
}

fn collect_sources(
    project: &Path,
    spec: &TemplateSpec,
    ctx: &tera::Context,
    skipped: &mut Vec<String>,
) -> Result<Vec<SourceFile>, RenderError> {
    let verbatim: Vec<glob::Pattern> = spec
        .copy_without_render
        .iter()
        .map(|p| glob::Pattern::new(p))
        .collect::<Result<_, _>>()?;

    let mut sources = Vec::new();
    for entry in walkdir::WalkDir::new(project).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(project).to_path_buf();
            io_err(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let source = entry.path().to_path_buf();
        let rel = source.strip_prefix(project).unwrap_or(source.as_path());
        let name = to_posix(rel);

        let Some(output) = render_path(rel, ctx)? else {
            skipped.push(name);
            continue;
        };

        let bytes = std::fs::read(&source).map_err(|e| io_err(&source, e))?;
        let copy_raw = verbatim.iter().any(|p| p.matches(&name));
        let body = if copy_raw || std::str::from_utf8(&bytes).is_err() {
            Body::Verbatim(bytes)
        } else {
            Body::Text
        };
        sources.push(SourceFile {
            name,
            source,
            output,
            body,
        });
    }
    Ok(sources)
}

fn build_tera(sources: &[SourceFile]) -> Result<Tera, RenderError> {
    let mut templates = Vec::new();
    for file in sources {
        if let Body::Text = file.body {
            let content =
                std::fs::read_to_string(&file.source).map_err(|e| io_err(&file.source, e))?;
            templates.push((file.name.clone(), content));
        }
    }
    let mut tera = Tera::default();
    // Generated files are not web pages.
    tera.autoescape_on(vec![]);
    tera.add_raw_templates(templates)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// render_tree
// ---------------------------------------------------------------------------

/// Render `<template_dir>/project/` into `output_dir`.
///
/// `output_dir` is created if missing. Existing files at the same paths are
/// overwritten; anything else in `output_dir` is left alone.
pub fn render_tree(
    template_dir: &Path,
    output_dir: &Path,
    spec: &TemplateSpec,
    ctx: &RenderContext,
) -> Result<RenderSummary, RenderError> {
    let project = template_dir.join(PROJECT_DIR);
    let tera_ctx = ctx.to_tera_context();

    let mut summary = RenderSummary::default();
    let sources = collect_sources(&project, spec, &tera_ctx, &mut summary.skipped)?;
    let tera = build_tera(&sources)?;

    std::fs::create_dir_all(output_dir).map_err(|e| io_err(output_dir, e))?;
    for file in &sources {
        let dest = output_dir.join(&file.output);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        match &file.body {
            Body::Verbatim(bytes) => {
                std::fs::write(&dest, bytes).map_err(|e| io_err(&dest, e))?;
            }
            Body::Text => {
                let rendered = tera.render(&file.name, &tera_ctx).map_err(|e| {
                    RenderError::Template {
                        path: file.name.clone(),
                        source: e,
                    }
                })?;
                let rendered = rendered.replace("\r\n", "\n");
                std::fs::write(&dest, rendered).map_err(|e| io_err(&dest, e))?;
            }
        }
        copy_executable_bits(&file.source, &dest)?;
        summary.files.push(to_posix(&file.output));
    }

    summary.files.sort();
    summary.skipped.sort();
    Ok(summary)
}

#[cfg(unix)]
fn copy_executable_bits(source: &Path, dest: &Path) -> Result<(), RenderError> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(source)
        .map_err(|e| io_err(source, e))?
        .permissions()
        .mode();
    if mode & 0o111 == 0 {
        return Ok(());
    }
    let mut perms = std::fs::metadata(dest)
        .map_err(|e| io_err(dest, e))?
        .permissions();
    perms.set_mode(perms.mode() | (mode & 0o111));
    std::fs::set_permissions(dest, perms).map_err(|e| io_err(dest, e))
}

#[cfg(not(unix))]
fn copy_executable_bits(_source: &Path, _dest: &Path) -> Result<(), RenderError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
