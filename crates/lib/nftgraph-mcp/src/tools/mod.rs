//! MCP tool modules.
//!
//! Tools are grouped by domain: live NFT lookups, ownership graph sync and
//! queries, and contextual help.

pub mod graph;
pub mod nft;
mod context;
