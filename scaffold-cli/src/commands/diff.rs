//! `scaffold diff <TEMPLATE_DIR> <OUTPUT_DIR>`: show unified diffs for what
//! generate would change.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use scaffold_sync::preview;

use super::context::{self, ContextArgs};

/// Arguments for `scaffold diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Template directory (holds template.yaml and project/).
    pub template_dir: PathBuf,

    /// Previously generated directory to compare against.
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub context: ContextArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let resolved = context::resolve(&self.template_dir, &self.context, false)?;

        let diffs = preview(&self.template_dir, &self.output_dir, &resolved.spec, &resolved.ctx)
            .with_context(|| format!("diff failed for '{}'", self.output_dir.display()))?;

        if diffs.is_empty() {
            println!("No differences for '{}'.", self.output_dir.display());
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
