//! Core domain types for the user graph.
//!
//! Users are nodes, relationships are typed directed edges between them.
//! JSON field names follow the camelCase wire format served over HTTP.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

// ── Identifiers ───────────────────────────────────────────────────

/// Opaque, globally unique identifier of a user node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ── Timestamps ────────────────────────────────────────────────────

/// Seconds since the Unix epoch.
///
/// Stored as an integer in the graph, but carried over JSON as a decimal
/// string (`"1718000000"`) so no client loses precision on the way. Both
/// the string and the bare integer form are accepted when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpochSeconds(pub i64);

impl EpochSeconds {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }
}

impl fmt::Display for EpochSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EpochSeconds {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl Serialize for EpochSeconds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EpochSeconds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(i64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
            Repr::Number(n) => Ok(Self(n)),
        }
    }
}

// ── Nodes ─────────────────────────────────────────────────────────

/// A user node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: EpochSeconds,
}

/// A user reduced to the fields shown next to a relationship.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// A user together with everyone it is connected to by a FRIEND edge,
/// regardless of edge direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserWithRelationships {
    #[serde(flatten)]
    pub user: User,
    pub friends: Vec<User>,
    pub relationship_count: usize,
}

impl UserWithRelationships {
    pub fn new(user: User, friends: Vec<User>) -> Self {
        let relationship_count = friends.len();
        Self {
            user,
            friends,
            relationship_count,
        }
    }
}

// ── Edges ─────────────────────────────────────────────────────────

/// The closed set of relationship labels this service writes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    Friend,
    Colleague,
    Family,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 3] = [Self::Friend, Self::Colleague, Self::Family];

    /// The Cypher relationship label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Friend => "FRIEND",
            Self::Colleague => "COLLEAGUE",
            Self::Family => "FAMILY",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known relationship labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown relationship type: {0}")]
pub struct UnknownRelationshipType(pub String);

impl FromStr for RelationshipType {
    type Err = UnknownRelationshipType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownRelationshipType(s.to_string()))
    }
}

/// One stored edge as listed to clients.
///
/// `relationship_type` is whatever label the store holds; it is not
/// narrowed to [`RelationshipType`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationshipDisplay {
    pub from: UserSummary,
    pub to: UserSummary,
    #[serde(rename = "type")]
    pub relationship_type: String,
}

// ── Inputs ────────────────────────────────────────────────────────

/// A validated create-user request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
}

/// A validated create-relationship request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateRelationshipInput {
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
}

impl CreateRelationshipInput {
    pub fn is_self_relationship(&self) -> bool {
        self.from_user_id == self.to_user_id
    }
}
