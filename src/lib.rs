//! # Course Snapshot
//!
//! Assembles the course catalog of one semester into a single nested,
//! denormalized document ready for direct client consumption.
//!
//! ## Modules
//!
//! - `assemble` - Joins the four row streams into a `Snapshot`
//! - `catalog` - Row shapes and snapshot document types
//! - `config` - TOML and environment configuration
//! - `error` - Error taxonomy shared by every layer
//! - `server` - HTTP handlers exposing the snapshot
//! - `service` - Snapshot providers over Postgres or fixture rows
//! - `source` - Row sources delivering the four query result streams
pub mod assemble;
pub mod catalog;
pub mod config;
pub mod error;
pub mod server;
pub mod service;
pub mod source;

pub use assemble::{assemble, assemble_with_clock};
pub use catalog::Snapshot;
pub use config::{CatalogConfig, Semester};
pub use error::{CatalogError, CatalogResult, RowKind};
pub use service::SnapshotProvider;
