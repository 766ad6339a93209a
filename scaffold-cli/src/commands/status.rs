//! `scaffold status <OUTPUT_DIR>`: drift between a generated directory and
//! its manifest.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use scaffold_sync::status::{self, format_system_time_age, FileStatus, StatusReport, TrackedFile};
use scaffold_sync::StatusSignal;

/// Arguments for `scaffold status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Previously generated directory.
    pub output_dir: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusJson<'a> {
    output_dir: String,
    status: &'static str,
    last_generated_age: Option<String>,
    files: &'a [TrackedFile],
}

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "file")]
    path: String,
    #[tabled(rename = "status")]
    status: String,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let report = status::check(&self.output_dir)
            .with_context(|| format!("status check failed for '{}'", self.output_dir.display()))?;

        let (files, age) = match &report {
            StatusReport::NeverGenerated => (&[] as &[TrackedFile], None),
            StatusReport::Generated {
                files,
                last_generated,
            } => (files.as_slice(), last_generated.map(format_system_time_age)),
        };

        if self.json {
            let payload = StatusJson {
                output_dir: self.output_dir.display().to_string(),
                status: signal_key(report.signal()),
                last_generated_age: age,
                files,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
            );
            return Ok(());
        }

        if report.signal() == StatusSignal::NeverGenerated {
            println!(
                "No scaffold manifest in '{}'. Run 'scaffold generate' first.",
                self.output_dir.display()
            );
            return Ok(());
        }

        println!(
            "scaffold v{} | {} | {} tracked | last generated {} ago",
            env!("CARGO_PKG_VERSION"),
            self.output_dir.display(),
            files.len(),
            age.as_deref().unwrap_or("?"),
        );
        println!(
            "Indicators: {} CURRENT  {} MODIFIED  {} MISSING",
            indicator(FileStatus::Current),
            indicator(FileStatus::Modified),
            indicator(FileStatus::Missing),
        );

        let rows: Vec<FileRow> = files
            .iter()
            .filter(|f| f.status != FileStatus::Current)
            .map(|f| FileRow {
                path: f.path.clone(),
                status: format!("{} {}", indicator(f.status), status_label(f.status)),
            })
            .collect();
        if rows.is_empty() {
            println!("{} all generated files are up to date", indicator(FileStatus::Current));
            return Ok(());
        }
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        println!(
            "Run 'scaffold diff <TEMPLATE_DIR> {}' to preview the next generation.",
            self.output_dir.display()
        );
        Ok(())
    }
}

fn signal_key(signal: StatusSignal) -> &'static str {
    match signal {
        StatusSignal::NeverGenerated => "never_generated",
        StatusSignal::Current => "current",
        StatusSignal::Modified => "modified",
        StatusSignal::Missing => "missing",
    }
}

fn status_label(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Current => "CURRENT",
        FileStatus::Modified => "MODIFIED",
        FileStatus::Missing => "MISSING",
    }
}

fn indicator(status: FileStatus) -> String {
    match status {
        FileStatus::Current => "■".green().bold().to_string(),
        FileStatus::Modified => "■".red().bold().to_string(),
        FileStatus::Missing => "■".yellow().bold().to_string(),
    }
}
