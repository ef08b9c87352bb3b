use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::handlers::members::MemberResponse;
use crate::domain::repositories::TeamRepository;
use crate::domain::team::Team;
use crate::infrastructure::repositories::SqliteTeamRepository;

/// Request body for creating a team
#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
}

/// Team as returned by the API, with its members when loaded
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub members: Vec<MemberResponse>,
}

impl TeamResponse {
    fn new(team: &Team, members: Vec<MemberResponse>) -> Self {
        Self {
            id: team.id(),
            name: team.name().to_string(),
            members,
        }
    }
}

/// Create a new team
///
/// POST /api/teams
pub async fn create_team(
    State(pool): State<SqlitePool>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Team name cannot be empty"));
    }

    let team = Team::new(req.name);
    let team_repo = SqliteTeamRepository::new(pool);
    team_repo.save(&team).await?;

    tracing::info!(team_id = %team.id(), "team created");
    Ok((StatusCode::CREATED, Json(TeamResponse::new(&team, Vec::new()))))
}

/// Get a team and its members by ID
///
/// GET /api/teams/:id
pub async fn get_team(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team_repo = SqliteTeamRepository::new(pool);
    let team = team_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Team not found: {}", id)))?;

    let members = team_repo
        .find_members(id)
        .await?
        .iter()
        .map(MemberResponse::from)
        .collect();

    Ok(Json(TeamResponse::new(&team, members)))
}

/// Delete a team; its members stay without a team
///
/// DELETE /api/teams/:id
pub async fn delete_team(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let team_repo = SqliteTeamRepository::new(pool);
    team_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
