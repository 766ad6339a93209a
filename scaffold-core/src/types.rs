//! Domain types shared by the renderer, the reconciliation engine, and the CLI.
//!
//! Manifest keys are destination-relative posix paths (`/`-separated,
//! case-preserving). All types are serializable via serde.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Lowercase hex SHA-256 digest of a file's bytes.
///
/// Only ever compared for equality; it identifies content, not files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed template name (the `name` field of `template.yaml`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateName(pub String);

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TemplateName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TemplateName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Relative posix path → fingerprint, one entry per tracked regular file.
///
/// A `BTreeMap` so iteration and serialization order are deterministic.
pub type Manifest = BTreeMap<String, Fingerprint>;

/// How a single path relates to the generated tree, the destination tree and
/// the manifest recorded by the previous run.
///
/// Derived on every run and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileClass {
    /// Generated, no destination file yet.
    New,
    /// Destination already holds exactly the generated content.
    Unchanged,
    /// Destination differs from both the generated content and the last
    /// recorded baseline (or has no baseline at all).
    UserModifiedConflict,
    /// Destination still matches the recorded baseline; only the template
    /// output moved.
    TemplateOnlyChange,
    /// No longer generated; destination matches the recorded baseline.
    StaleUnchanged,
    /// No longer generated; destination was edited or removed by the user.
    StaleModified,
}

impl FileClass {
    /// Classify a path the template still produces.
    ///
    /// `current` is the destination's hash (`None` when absent) and
    /// `recorded` is the previous manifest's entry (`None` when untracked).
    pub fn classify_generated(
        generated: &Fingerprint,
        current: Option<&Fingerprint>,
        recorded: Option<&Fingerprint>,
    ) -> Self {
        let Some(current) = current else {
            return FileClass::New;
        };
        if current == generated {
            return FileClass::Unchanged;
        }
        match recorded {
            Some(recorded) if recorded == current => FileClass::TemplateOnlyChange,
            _ => FileClass::UserModifiedConflict,
        }
    }

    /// Classify a path only the previous manifest knows about.
    pub fn classify_stale(current: Option<&Fingerprint>, recorded: &Fingerprint) -> Self {
        match current {
            Some(current) if current == recorded => FileClass::StaleUnchanged,
            _ => FileClass::StaleModified,
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeReport
// ---------------------------------------------------------------------------

/// What one generation run did to the destination tree.
///
/// Every list holds destination-relative posix paths and is sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub added: Vec<String>,
    pub deleted: Vec<String>,
    pub overwritten: Vec<String>,
    pub modified_template: Vec<String>,
}

impl ChangeReport {
    /// Sort (and dedup) every list so output never depends on walk order.
    pub fn into_sorted(mut self) -> Self {
        for list in [
            &mut self.added,
            &mut self.deleted,
            &mut self.overwritten,
            &mut self.modified_template,
        ] {
            list.sort();
            list.dedup();
        }
        self
    }

    /// `true` when the run left the destination untouched.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.deleted.is_empty()
            && self.overwritten.is_empty()
            && self.modified_template.is_empty()
    }

    /// Total number of reported paths across all lists.
    pub fn len(&self) -> usize {
        self.added.len() + self.deleted.len() + self.overwritten.len() + self.modified_template.len()
    }
}
