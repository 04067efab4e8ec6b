//! Domain models and types for bisync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Report definitions** ([`ReportDefinition`]) read from the query catalog
//! - **Tabular results** ([`ResultSet`]) with the column algebra the merge relies on
//! - **Error types** ([`BisyncError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use bisync::domain::ResultSet;
//!
//! # fn example() -> bisync::domain::Result<()> {
//! let base = ResultSet::with_rows(
//!     vec!["id".into(), "name".into()],
//!     vec![vec![Some("1".into()), Some("a".into())]],
//! )?;
//! let custom = ResultSet::with_rows(
//!     vec!["id".into(), "color".into()],
//!     vec![vec![Some("1".into()), Some("red".into())]],
//! )?;
//!
//! let merged = base.left_join(&custom, "id")?;
//! assert_eq!(merged.columns(), &["id", "name", "color"]);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod report;
pub mod result;
pub mod table;

pub use errors::BisyncError;
pub use report::ReportDefinition;
pub use result::Result;
pub use table::{Cell, ResultSet};
