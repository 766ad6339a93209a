//! Generation pipeline: render a template into a staging directory, then
//! reconcile the staged tree into the destination.

use std::path::Path;

use tempfile::TempDir;

use scaffold_core::types::ChangeReport;
use scaffold_renderer::{render_tree, RenderContext, RenderSummary, TemplateSpec};

use crate::error::{io_err, FsOp, SyncError};
use crate::reconcile::reconcile;

/// Outcome of [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOutcome {
    pub report: ChangeReport,
    pub rendered: RenderSummary,
}

/// Render `template_dir` into a fresh staging directory.
///
/// The directory is deleted when the returned [`TempDir`] is dropped.
pub fn stage(
    template_dir: &Path,
    spec: &TemplateSpec,
    ctx: &RenderContext,
) -> Result<(TempDir, RenderSummary), SyncError> {
    let staging = tempfile::Builder::new()
        .prefix("scaffold-staging-")
        .tempdir()
        .map_err(|e| io_err(FsOp::CreateDir, std::env::temp_dir(), e))?;
    let summary = render_tree(template_dir, staging.path(), spec, ctx)?;
    tracing::debug!(
        "staged {} file(s) from {} in {}",
        summary.files.len(),
        template_dir.display(),
        staging.path().display()
    );
    Ok((staging, summary))
}

/// Render `template_dir` and merge the result into `dest`, creating `dest`
/// if needed. `confirm` is passed through to [`reconcile`].
pub fn generate<F>(
    template_dir: &Path,
    dest: &Path,
    spec: &TemplateSpec,
    ctx: &RenderContext,
    confirm: F,
) -> Result<GenerateOutcome, SyncError>
where
    F: FnMut(&str) -> Result<bool, SyncError>,
{
    std::fs::create_dir_all(dest).map_err(|e| io_err(FsOp::CreateDir, dest, e))?;
    let (staging, rendered) = stage(template_dir, spec, ctx)?;
    let report = reconcile(staging.path(), dest, confirm)?;
    Ok(GenerateOutcome { report, rendered })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::manifest_store;

    fn template(root: &Path) -> TemplateSpec {
        fs::create_dir_all(root.join("project/src")).unwrap();
        fs::write(
            root.join("template.yaml"),
            "name: demo\nvariables:\n  - name: project_name\n    default: demo\n",
        )
        .unwrap();
        fs::write(root.join("project/README.md"), "# {{ project_name }}\n").unwrap();
        fs::write(root.join("project/src/main.rs"), "fn main() {}\n").unwrap();
        TemplateSpec::load(root).unwrap()
    }

    #[test]
    fn generate_creates_dest_and_writes_manifest() {
        let tpl = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let spec = template(tpl.path());
        let ctx = RenderContext::new(&spec, vec![("project_name".into(), "hello".into())]);
        let dest = out.path().join("nested/hello");

        let outcome = generate(tpl.path(), &dest, &spec, &ctx, |_: &str| Ok(true)).unwrap();
        assert_eq!(outcome.report.added, vec!["README.md", "src/main.rs"]);
        assert_eq!(outcome.rendered.files, vec!["README.md", "src/main.rs"]);
        assert_eq!(fs::read_to_string(dest.join("README.md")).unwrap(), "# hello\n");
        let manifest = manifest_store::load(&dest).unwrap().unwrap();
        assert_eq!(manifest.len(), 2);
    }

    #[test]
    fn render_error_leaves_dest_untouched() {
        let tpl = TempDir::new().unwrap();
        let spec = template(tpl.path());
        fs::write(tpl.path().join("project/bad.txt"), "{{ unclosed").unwrap();
        let ctx = RenderContext::new(&spec, spec.default_answers());
        let out = TempDir::new().unwrap();

        let err = generate(tpl.path(), out.path(), &spec, &ctx, |_: &str| Ok(true)).unwrap_err();
        assert!(matches!(err, SyncError::Render(_)), "got: {err}");
        assert!(!manifest_store::sidecar_path(out.path()).exists());
    }
}
