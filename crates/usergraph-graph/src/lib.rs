//! usergraph-graph — Neo4j persistence for users and their relationships.
//!
//! This crate is the single owner of the database connection. All reads and
//! writes go through [`UserStore`], implemented for Neo4j by [`GraphClient`]
//! and in memory by [`MemoryStore`].

pub mod client;
mod mapping;
pub mod memory;
pub mod mutations;
pub mod queries;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use memory::MemoryStore;
pub use store::UserStore;
