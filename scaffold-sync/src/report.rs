//! Presentation of a [`ChangeReport`].

use std::fmt::Write;

use scaffold_core::types::ChangeReport;

/// One labelled list of paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSection<'a> {
    pub label: &'static str,
    pub paths: &'a [String],
}

/// The four sections in display order: added, deleted, overwritten, updated.
pub fn sections(report: &ChangeReport) -> [ReportSection<'_>; 4] {
    [
        ReportSection {
            label: "Added Files",
            paths: &report.added,
        },
        ReportSection {
            label: "Deleted Files",
            paths: &report.deleted,
        },
        ReportSection {
            label: "Overwritten Files",
            paths: &report.overwritten,
        },
        ReportSection {
            label: "Modified Template Files",
            paths: &report.modified_template,
        },
    ]
}

/// Plain-text rendering: each non-empty section as a heading followed by
/// ` - path` lines, sections separated by a blank line.
///
/// An empty report renders as `"No changes.\n"`.
pub fn format_plain(report: &ChangeReport) -> String {
    if report.is_empty() {
        return "No changes.\n".to_string();
    }
    let mut out = String::new();
    for section in sections(report).iter().filter(|s| !s.paths.is_empty()) {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", section.label);
        for path in section.paths {
            let _ = writeln!(out, " - {path}");
        }
    }
    out
}
