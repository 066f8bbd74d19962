use async_trait::async_trait;

use crate::domain::error::DomainResult;
use crate::domain::team::{NewTeam, Team};

/// Repository trait for teams
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Insert a new team; the store assigns the id
    async fn create(&self, team: NewTeam) -> DomainResult<Team>;

    /// Find a team by its id
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Team>>;

    /// Find all teams
    async fn find_all(&self) -> DomainResult<Vec<Team>>;
}
