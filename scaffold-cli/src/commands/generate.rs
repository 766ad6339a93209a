//! `scaffold generate <TEMPLATE_DIR> <OUTPUT_DIR>`: render and reconcile.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::{Color, Colorize};

use scaffold_core::{config, types::ChangeReport};
use scaffold_sync::{confirm, pipeline, sections};

use super::context::{self, ContextArgs};

/// Arguments for `scaffold generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Template directory (holds template.yaml and project/).
    pub template_dir: PathBuf,

    /// Directory to generate into; created if missing.
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub context: ContextArgs,

    /// Overwrite edited files without asking and skip variable prompts.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Skip variable prompts; conflicts are still confirmed.
    #[arg(long)]
    pub no_input: bool,

    /// Emit the change report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    pub fn run(self) -> Result<()> {
        let interactive = !(self.yes || self.no_input || self.context.replay);
        let resolved = context::resolve(&self.template_dir, &self.context, interactive)?;

        let auto_yes = self.yes;
        let outcome = pipeline::generate(
            &self.template_dir,
            &self.output_dir,
            &resolved.spec,
            &resolved.ctx,
            |path: &str| {
                if auto_yes {
                    Ok(true)
                } else {
                    confirm::terminal(path)
                }
            },
        )
        .with_context(|| {
            format!(
                "failed to generate '{}' into '{}'",
                resolved.spec.name,
                self.output_dir.display()
            )
        })?;

        if let Err(e) = config::save_replay(&resolved.spec.name, &resolved.answers()) {
            tracing::warn!("could not save replay answers: {e}");
        }

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome.report)
                    .context("failed to serialize change report")?
            );
            return Ok(());
        }

        print_report(&outcome.report);
        if outcome.report.is_empty() {
            println!("✓ '{}' is up to date", self.output_dir.display());
        } else {
            println!(
                "✓ Generated '{}' into '{}' ({} change(s))",
                resolved.spec.name,
                self.output_dir.display(),
                outcome.report.len()
            );
        }
        Ok(())
    }
}

/// Heading colors, in section order.
const SECTION_COLORS: [Color; 4] = [Color::Green, Color::Red, Color::Yellow, Color::Cyan];

fn print_report(report: &ChangeReport) {
    for (section, color) in sections(report).iter().zip(SECTION_COLORS) {
        if section.paths.is_empty() {
            continue;
        }
        println!("{}", section.label.color(color).bold());
        for path in section.paths {
            println!(" - {path}");
        }
        println!();
    }
}
