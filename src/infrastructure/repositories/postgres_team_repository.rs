use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::error::DomainResult;
use crate::domain::repositories::TeamRepository;
use crate::domain::team::{NewTeam, Team};

/// PostgreSQL implementation of TeamRepository
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Creates a new PostgresTeamRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team::from_persistence(row.id, row.name, row.created_at)
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn create(&self, team: NewTeam) -> DomainResult<Team> {
        let row = sqlx::query_as::<_, TeamRow>(
            "INSERT INTO teams (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(team.name())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>(
            "SELECT id, name, created_at FROM teams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Team::from))
    }

    async fn find_all(&self) -> DomainResult<Vec<Team>> {
        let rows = sqlx::query_as::<_, TeamRow>("SELECT id, name, created_at FROM teams ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Team::from).collect())
    }
}
