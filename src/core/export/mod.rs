//! Export orchestration
//!
//! - [`merge`]: base/customization reconciliation per report
//! - [`artifact`]: CSV artifact files
//! - [`coordinator`]: the run pipeline and its error dispatch
//! - [`summary`]: run and per-report outcomes

pub mod artifact;
pub mod coordinator;
pub mod merge;
pub mod summary;

pub use artifact::{read_artifact, write_artifact, ArtifactWriter};
pub use coordinator::SyncCoordinator;
pub use merge::{reconcile, MergeEngine, Reconciled, ScopeCheck};
pub use summary::{ReportOutcome, RunStatus, RunSummary};
