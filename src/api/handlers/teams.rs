use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::api::errors::ApiError;
use crate::domain::repositories::TeamRepository;
use crate::domain::team::{NewTeam, Team};
use crate::infrastructure::repositories::PostgresTeamRepository;

/// Request body for creating a team
#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
}

/// Response for team reads
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: i64,
    pub name: String,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id(),
            name: team.name().to_string(),
        }
    }
}

/// Create a new team
///
/// POST /api/teams
pub async fn create_team(
    State(pool): State<PgPool>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    let new_team = NewTeam::new(req.name)?;

    let repo = PostgresTeamRepository::new(pool);
    let team = repo.create(new_team).await?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(&team))))
}

/// Get a team by ID
///
/// GET /api/teams/:id
pub async fn get_team(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Json<TeamResponse>, ApiError> {
    let repo = PostgresTeamRepository::new(pool);
    let team = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("team not found: {}", id)))?;

    Ok(Json(TeamResponse::from(&team)))
}

/// List all teams
///
/// GET /api/teams
pub async fn list_teams(State(pool): State<PgPool>) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let repo = PostgresTeamRepository::new(pool);
    let teams = repo.find_all().await?;

    let responses = teams.iter().map(TeamResponse::from).collect();
    Ok(Json(responses))
}
