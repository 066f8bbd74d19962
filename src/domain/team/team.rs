use chrono::{DateTime, Utc};

use crate::domain::error::{DomainError, DomainResult};

/// Team entity
///
/// Many members may reference one team; the team does not own the reverse
/// side of the relationship at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
}

impl Team {
    /// Returns the store-assigned team id
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the team name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reconstructs a Team from persistence layer data
    ///
    /// Only to be used by repository implementations.
    pub fn from_persistence(id: i64, name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }
}

/// A team that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewTeam {
    name: String,
}

impl NewTeam {
    /// Validates and builds creation input for a team
    ///
    /// # Business Rules Enforced
    /// - Name must not be empty
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::Validation {
                entity: "team",
                reason: "name cannot be empty".to_string(),
            });
        }

        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
