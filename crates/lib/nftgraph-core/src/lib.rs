//! Core types and services for nftgraph-mcp.
//!
//! This crate owns the NFT data API client, the `SurrealDB` ownership graph,
//! and the control plane that validates lookups and loads API results into
//! the graph.

pub mod client;
pub mod control;
pub mod store;
