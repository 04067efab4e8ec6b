//! PostgreSQL metadata store adapter
//!
//! Holds the single read-only session a run uses to read the query catalog
//! and to execute report queries.

pub mod client;
pub mod rows;
pub mod sql;

pub use client::{PgSession, PostgresConnector};
