//! In-memory [`UserStore`] for tests and local runs without Neo4j.
//!
//! Mirrors the Neo4j implementation's observable behaviour: newest users
//! first, undirected distinct friend lookup, relationships listed once in
//! stored direction, and errors for missing or identical endpoints.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use usergraph_core::{
    CreateRelationshipInput, CreateUserInput, EpochSeconds, RelationshipDisplay,
    RelationshipType, User, UserId, UserSummary, UserWithRelationships,
};

use crate::client::GraphError;
use crate::store::UserStore;

#[derive(Debug, Clone)]
struct StoredEdge {
    from: UserId,
    to: UserId,
    label: String,
}

#[derive(Debug, Default)]
struct MemoryData {
    // Insertion order; newest last.
    users: Vec<User>,
    edges: Vec<StoredEdge>,
}

impl MemoryData {
    fn find(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }
}

/// A [`UserStore`] backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<MemoryData>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails as if the database were down.
    pub fn unavailable() -> Self {
        Self {
            data: Mutex::default(),
            unavailable: true,
        }
    }

    /// Number of stored edges.
    pub fn relationship_count(&self) -> usize {
        self.lock().edges.len()
    }

    /// Store an edge with an arbitrary label, bypassing the typed API.
    pub fn insert_raw_relationship(&self, from: &UserId, to: &UserId, label: &str) {
        self.lock().edges.push(StoredEdge {
            from: from.clone(),
            to: to.clone(),
            label: label.to_string(),
        });
    }

    fn lock(&self) -> MutexGuard<'_, MemoryData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), GraphError> {
        if self.unavailable {
            Err(GraphError::Connection("memory store is unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, GraphError> {
        self.check_available()?;
        let data = self.lock();
        let mut users: Vec<User> = data.users.iter().rev().cloned().collect();
        // Stable sort keeps newer insertions first within the same second.
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn create_user(&self, input: &CreateUserInput) -> Result<User, GraphError> {
        self.check_available()?;
        let user = User {
            id: UserId::new(),
            name: input.name.clone(),
            email: input.email.clone(),
            created_at: EpochSeconds::now(),
        };
        self.lock().users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, GraphError> {
        self.check_available()?;
        Ok(self.lock().find(user_id).cloned())
    }

    async fn get_user_with_relationships(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserWithRelationships>, GraphError> {
        self.check_available()?;
        let data = self.lock();
        let Some(user) = data.find(user_id).cloned() else {
            return Ok(None);
        };

        let friend_label = RelationshipType::Friend.as_str();
        let mut friend_ids: Vec<&UserId> = Vec::new();
        for edge in data.edges.iter().filter(|e| e.label == friend_label) {
            let other = if &edge.from == user_id {
                &edge.to
            } else if &edge.to == user_id {
                &edge.from
            } else {
                continue;
            };
            if !friend_ids.contains(&other) {
                friend_ids.push(other);
            }
        }

        let friends = friend_ids
            .into_iter()
            .filter_map(|id| data.find(id).cloned())
            .collect();

        Ok(Some(UserWithRelationships::new(user, friends)))
    }

    async fn create_relationship(
        &self,
        input: &CreateRelationshipInput,
    ) -> Result<(), GraphError> {
        self.check_available()?;
        if input.is_self_relationship() {
            return Err(GraphError::InvalidInput(format!(
                "user {} cannot have a relationship with themselves",
                input.from_user_id
            )));
        }

        let mut data = self.lock();
        if data.find(&input.from_user_id).is_none() || data.find(&input.to_user_id).is_none() {
            return Err(GraphError::EndpointNotFound {
                from_user_id: input.from_user_id.to_string(),
                to_user_id: input.to_user_id.to_string(),
            });
        }

        data.edges.push(StoredEdge {
            from: input.from_user_id.clone(),
            to: input.to_user_id.clone(),
            label: input.relationship_type.as_str().to_string(),
        });
        Ok(())
    }

    async fn list_relationships(&self) -> Result<Vec<RelationshipDisplay>, GraphError> {
        self.check_available()?;
        let data = self.lock();
        Ok(data
            .edges
            .iter()
            .filter_map(|edge| {
                let from = data.find(&edge.from)?;
                let to = data.find(&edge.to)?;
                Some(RelationshipDisplay {
                    from: UserSummary::from(from),
                    to: UserSummary::from(to),
                    relationship_type: edge.label.clone(),
                })
            })
            .collect())
    }

    async fn verify_connection(&self) -> bool {
        !self.unavailable
    }
}
