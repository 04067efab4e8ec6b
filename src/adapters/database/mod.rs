//! Metadata store abstraction layer
//!
//! Trait-based seams between the pipeline and the store backend.

pub mod traits;

pub use traits::{QueryExecutor, ReportCatalog, StoreConnector, StoreSession};
