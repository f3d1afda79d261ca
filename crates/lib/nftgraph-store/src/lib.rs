//! Storage models and schema helpers for nftgraph-mcp.
//!
//! This crate defines the data model shared by the API client, the control
//! plane, and the graph store, plus the `SurrealQL` statements the store runs.

pub mod models;
pub mod schema;

pub use models::*;
