//! # scaffold-sync
//!
//! Reconciliation of generated trees into a destination directory that the
//! user may have edited since the last generation.
//!
//! Call [`generate`] to render a template and merge it into a destination, or
//! [`reconcile`] to merge an already rendered tree. The fingerprints recorded
//! in the destination's sidecar manifest decide which files are safe to
//! update, which need confirmation and which stale files can be removed.

pub mod confirm;
pub mod diff;
pub mod error;
pub mod hasher;
pub mod manifest_store;
pub mod pipeline;
pub mod prune;
pub mod reconcile;
pub mod report;
pub mod status;

pub use diff::{preview, DiffKind, FileDiff};
pub use error::{FsOp, SyncError};
pub use hasher::{build_manifest, hash_file};
pub use pipeline::{generate, GenerateOutcome};
pub use prune::prune;
pub use reconcile::reconcile;
pub use report::{format_plain, sections, ReportSection};
pub use status::{StatusReport, StatusSignal};
