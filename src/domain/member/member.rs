use chrono::{DateTime, Utc};

use crate::domain::error::{DomainError, DomainResult};

/// Member entity
///
/// A member optionally belongs to one team and may have no username.
/// Identity is assigned by the store at creation and is immutable afterwards.
///
/// # Invariants
/// - Age is non-negative
/// - `id` never changes once assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    id: i64,
    username: Option<String>,
    age: i32,
    team_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl Member {
    /// Returns the store-assigned member id
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the username, if one is set
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the member's age
    pub fn age(&self) -> i32 {
        self.age
    }

    /// Returns the id of the team this member belongs to, if any
    pub fn team_id(&self) -> Option<i64> {
        self.team_id
    }

    /// Returns the creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reconstructs a Member from persistence layer data
    ///
    /// Bypasses validation since the data was validated when stored.
    /// Only to be used by repository implementations.
    pub fn from_persistence(
        id: i64,
        username: Option<String>,
        age: i32,
        team_id: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            age,
            team_id,
            created_at,
        }
    }
}

/// A member that has not been persisted yet
///
/// The store assigns the id on insert, so creation input is a separate type
/// from the entity itself.
#[derive(Debug, Clone)]
pub struct NewMember {
    username: Option<String>,
    age: i32,
    team_id: Option<i64>,
}

impl NewMember {
    /// Validates and builds creation input for a member
    ///
    /// # Business Rules Enforced
    /// - Age must be non-negative
    pub fn new(
        username: Option<String>,
        age: i32,
        team_id: Option<i64>,
    ) -> DomainResult<Self> {
        if age < 0 {
            return Err(DomainError::Validation {
                entity: "member",
                reason: format!("age must be non-negative, got {}", age),
            });
        }

        Ok(Self {
            username,
            age,
            team_id,
        })
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn team_id(&self) -> Option<i64> {
        self.team_id
    }
}
