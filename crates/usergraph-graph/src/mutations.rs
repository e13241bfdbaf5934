//! Write operations for the user graph.
//!
//! Users are always created, never merged: two identical requests produce
//! two users with different ids.

use neo4rs::query;

use usergraph_core::{CreateRelationshipInput, CreateUserInput, EpochSeconds, User, UserId};

use crate::client::{GraphClient, GraphError};
use crate::mapping::{column, user_from_node};

impl GraphClient {
    /// Create a user node with a fresh id and the current time.
    pub async fn create_user(&self, input: &CreateUserInput) -> Result<User, GraphError> {
        let id = UserId::new();
        let created_at = EpochSeconds::now();

        let q = query(
            "CREATE (u:User {id: $id, name: $name, email: $email, createdAt: $created_at})
             RETURN u",
        )
        .param("id", id.as_str())
        .param("name", input.name.as_str())
        .param("email", input.email.as_str())
        .param("created_at", created_at.as_i64());

        let row = self
            .query_one(q)
            .await?
            .ok_or(GraphError::EmptyResult {
                operation: "create_user",
            })?;
        let node: neo4rs::Node = column(&row, "u")?;
        let user = user_from_node(&node)?;

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// Create one directed edge `from -[type]-> to`.
    ///
    /// Fails with [`GraphError::EndpointNotFound`] if either user is absent
    /// and with [`GraphError::InvalidInput`] for a self-relationship.
    pub async fn create_relationship(
        &self,
        input: &CreateRelationshipInput,
    ) -> Result<(), GraphError> {
        if input.is_self_relationship() {
            return Err(GraphError::InvalidInput(format!(
                "user {} cannot have a relationship with themselves",
                input.from_user_id
            )));
        }

        // The label comes from a closed enum, so interpolating it is safe.
        let rel_type = input.relationship_type.as_str();
        let cypher = format!(
            "MATCH (from:User {{id: $from_id}}), (to:User {{id: $to_id}})
             CREATE (from)-[r:{rel_type}]->(to)
             RETURN count(r) AS created"
        );

        let q = query(&cypher)
            .param("from_id", input.from_user_id.as_str())
            .param("to_id", input.to_user_id.as_str());

        let created = match self.query_one(q).await? {
            Some(row) => column::<i64>(&row, "created")?,
            None => 0,
        };

        if created == 0 {
            return Err(GraphError::EndpointNotFound {
                from_user_id: input.from_user_id.to_string(),
                to_user_id: input.to_user_id.to_string(),
            });
        }

        tracing::info!(
            from = %input.from_user_id,
            to = %input.to_user_id,
            rel_type,
            "Created relationship"
        );
        Ok(())
    }
}
