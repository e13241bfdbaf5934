//! usergraph-core: Shared types, validation, configuration, and error handling.
//!
//! This crate provides the foundational pieces used across all usergraph crates:
//! - User and relationship types for the graph
//! - Request validation for create-user and create-relationship payloads
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod types;
pub mod validation;

pub use error::UsergraphError;
pub use types::{
    CreateRelationshipInput, CreateUserInput, EpochSeconds, RelationshipDisplay,
    RelationshipType, User, UserId, UserSummary, UserWithRelationships,
};
pub use validation::{FieldIssue, ValidationError};
