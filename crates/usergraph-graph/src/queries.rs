//! Read operations for the user graph.

use neo4rs::query;

use usergraph_core::{RelationshipDisplay, User, UserId, UserWithRelationships};

use crate::client::{GraphClient, GraphError};
use crate::mapping::{column, summary_from_node, user_from_node};

impl GraphClient {
    // ── Users ────────────────────────────────────────────────────

    /// List every user, most recently created first.
    pub async fn list_users(&self) -> Result<Vec<User>, GraphError> {
        let q = query("MATCH (u:User) RETURN u ORDER BY u.createdAt DESC");

        let rows = self.query_rows(q).await?;
        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = column(&row, "u")?;
            users.push(user_from_node(&node)?);
        }
        Ok(users)
    }

    /// Get a user by id.
    pub async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, GraphError> {
        let q = query("MATCH (u:User {id: $id}) RETURN u").param("id", user_id.as_str());

        match self.query_one(q).await? {
            Some(row) => {
                let node: neo4rs::Node = column(&row, "u")?;
                Ok(Some(user_from_node(&node)?))
            }
            None => Ok(None),
        }
    }

    /// Get a user plus everyone joined to it by a FRIEND edge in either
    /// direction. Each friend appears once.
    pub async fn get_user_with_relationships(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserWithRelationships>, GraphError> {
        let q = query(
            "MATCH (u:User {id: $id})
             OPTIONAL MATCH (u)-[:FRIEND]-(friend:User)
             RETURN u, collect(DISTINCT friend) AS friends",
        )
        .param("id", user_id.as_str());

        let Some(row) = self.query_one(q).await? else {
            return Ok(None);
        };

        let node: neo4rs::Node = column(&row, "u")?;
        let user = user_from_node(&node)?;

        let friend_nodes: Vec<neo4rs::Node> = column(&row, "friends")?;
        let friends = friend_nodes
            .iter()
            .map(user_from_node)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(UserWithRelationships::new(user, friends)))
    }

    // ── Relationships ────────────────────────────────────────────

    /// List every edge between two users, once each, in stored direction.
    ///
    /// The label is passed through as stored, even if it is not one of the
    /// types this service writes.
    pub async fn list_relationships(&self) -> Result<Vec<RelationshipDisplay>, GraphError> {
        let q = query(
            "MATCH (from:User)-[r]->(to:User)
             RETURN from, to, type(r) AS relationship_type",
        );

        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let from: neo4rs::Node = column(&row, "from")?;
            let to: neo4rs::Node = column(&row, "to")?;
            results.push(RelationshipDisplay {
                from: summary_from_node(&from)?,
                to: summary_from_node(&to)?,
                relationship_type: column(&row, "relationship_type")?,
            });
        }
        Ok(results)
    }
}
