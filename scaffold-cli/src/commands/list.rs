//! `scaffold list <TEMPLATES_ROOT>`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use scaffold_renderer::discover_templates;

/// Arguments for `scaffold list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Directory whose subdirectories are templates.
    pub templates_root: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Tabled)]
struct TemplateRow {
    #[tabled(rename = "template")]
    name: String,
    #[tabled(rename = "description")]
    description: String,
    #[tabled(rename = "path")]
    path: String,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let templates = discover_templates(&self.templates_root).with_context(|| {
            format!("failed to read templates under '{}'", self.templates_root.display())
        })?;

        let rows: Vec<TemplateRow> = templates
            .into_iter()
            .map(|t| TemplateRow {
                name: t.name.0,
                description: t.description.unwrap_or_default(),
                path: t.path.display().to_string(),
            })
            .collect();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize template list")?
            );
            return Ok(());
        }

        if rows.is_empty() {
            println!("No templates found under '{}'.", self.templates_root.display());
            return Ok(());
        }
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
