//! Conversion from Neo4j rows and nodes into domain types.
//!
//! Every property is required. A node that lacks one, or holds it with the
//! wrong type, is an error rather than an empty value.

use serde::de::DeserializeOwned;

use usergraph_core::{EpochSeconds, User, UserId, UserSummary};

use crate::client::GraphError;

const USER_LABEL: &str = "User";

/// Read a column from a result row.
pub(crate) fn column<T: DeserializeOwned>(
    row: &neo4rs::Row,
    name: &'static str,
) -> Result<T, GraphError> {
    row.get::<T>(name).map_err(|e| GraphError::MissingColumn {
        column: name,
        reason: e.to_string(),
    })
}

fn property<T: DeserializeOwned>(node: &neo4rs::Node, key: &'static str) -> Result<T, GraphError> {
    node.get::<T>(key).map_err(|e| GraphError::MissingProperty {
        label: USER_LABEL,
        property: key,
        reason: e.to_string(),
    })
}

/// Map a `:User` node to a [`User`].
pub(crate) fn user_from_node(node: &neo4rs::Node) -> Result<User, GraphError> {
    Ok(User {
        id: UserId(property(node, "id")?),
        name: property(node, "name")?,
        email: property(node, "email")?,
        created_at: EpochSeconds(property(node, "createdAt")?),
    })
}

/// Map a `:User` node to the summary shown in relationship listings.
pub(crate) fn summary_from_node(node: &neo4rs::Node) -> Result<UserSummary, GraphError> {
    Ok(UserSummary {
        id: UserId(property(node, "id")?),
        name: property(node, "name")?,
        email: property(node, "email")?,
    })
}
