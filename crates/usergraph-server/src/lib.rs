//! usergraph-server: HTTP API for users and their relationships.
//!
//! Each route validates its input, calls one [`usergraph_graph::UserStore`]
//! operation, and maps the outcome to a JSON response.

pub mod error;
pub mod routes;

pub use routes::{build_router, AppState};
