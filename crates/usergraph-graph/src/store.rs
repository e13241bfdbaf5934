//! The persistence seam used by the HTTP layer.

use async_trait::async_trait;

use usergraph_core::{
    CreateRelationshipInput, CreateUserInput, RelationshipDisplay, User, UserId,
    UserWithRelationships,
};

use crate::client::{GraphClient, GraphError};

/// Operations the service performs against its user store.
///
/// Reads that miss return `Ok(None)`. Every failure, including a failed
/// relationship create, is reported through `Err`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, most recently created first.
    async fn list_users(&self) -> Result<Vec<User>, GraphError>;

    /// Persist a new user with a generated id and creation time.
    async fn create_user(&self, input: &CreateUserInput) -> Result<User, GraphError>;

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, GraphError>;

    /// The user and its FRIEND neighbours, edge direction ignored.
    async fn get_user_with_relationships(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserWithRelationships>, GraphError>;

    async fn create_relationship(&self, input: &CreateRelationshipInput)
        -> Result<(), GraphError>;

    /// Every stored edge between users, once each.
    async fn list_relationships(&self) -> Result<Vec<RelationshipDisplay>, GraphError>;

    /// Whether the store currently answers queries.
    async fn verify_connection(&self) -> bool;
}

#[async_trait]
impl UserStore for GraphClient {
    async fn list_users(&self) -> Result<Vec<User>, GraphError> {
        GraphClient::list_users(self).await
    }

    async fn create_user(&self, input: &CreateUserInput) -> Result<User, GraphError> {
        GraphClient::create_user(self, input).await
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, GraphError> {
        GraphClient::get_user(self, user_id).await
    }

    async fn get_user_with_relationships(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserWithRelationships>, GraphError> {
        GraphClient::get_user_with_relationships(self, user_id).await
    }

    async fn create_relationship(
        &self,
        input: &CreateRelationshipInput,
    ) -> Result<(), GraphError> {
        GraphClient::create_relationship(self, input).await
    }

    async fn list_relationships(&self) -> Result<Vec<RelationshipDisplay>, GraphError> {
        GraphClient::list_relationships(self).await
    }

    async fn verify_connection(&self) -> bool {
        GraphClient::verify_connection(self).await
    }
}
