use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::domain::member::{Member, MemberSearchCondition, MemberTeamDto};
use crate::domain::paging::{Page, PageRequest};
use crate::domain::repositories::{MemberRepository, TeamRepository};
use crate::infrastructure::queries::MemberQueryService;
use crate::infrastructure::repositories::{SqliteMemberRepository, SqliteTeamRepository};

/// Query string accepted by the member search endpoints
///
/// Kept flat: paging and filter fields share one struct because
/// `serde(flatten)` does not parse numbers from query strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSearchParams {
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl MemberSearchParams {
    fn condition(&self) -> MemberSearchCondition {
        MemberSearchCondition {
            username: self.username.clone(),
            team_name: self.team_name.clone(),
            age_goe: self.age_goe,
            age_loe: self.age_loe,
        }
    }

    fn page_request(&self) -> PageRequest {
        PageRequest::from_params(self.page, self.size)
    }
}

/// Request body for creating a member
#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<Uuid>,
}

/// Member as returned by the API
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<Uuid>,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id(),
            username: member.username().map(str::to_string),
            age: member.age(),
            team_id: member.team_id(),
        }
    }
}

/// Search members with optional filters
///
/// GET /v1/members
pub async fn search_members(
    State(pool): State<SqlitePool>,
    Query(params): Query<MemberSearchParams>,
) -> Result<Json<Vec<MemberTeamDto>>, ApiError> {
    let member_repo = SqliteMemberRepository::new(pool);
    let members = member_repo.search(&params.condition()).await?;

    Ok(Json(members))
}

/// Search members one page at a time, always counting the total
///
/// GET /v2/members
pub async fn search_members_page_simple(
    State(pool): State<SqlitePool>,
    Query(params): Query<MemberSearchParams>,
) -> Result<Json<Page<MemberTeamDto>>, ApiError> {
    let queries = MemberQueryService::new(pool);
    let page = queries
        .search_page_simple(&params.condition(), params.page_request())
        .await?;

    Ok(Json(page))
}

/// Search members one page at a time, counting only when needed
///
/// GET /v3/members
pub async fn search_members_page_optimized(
    State(pool): State<SqlitePool>,
    Query(params): Query<MemberSearchParams>,
) -> Result<Json<Page<MemberTeamDto>>, ApiError> {
    let queries = MemberQueryService::new(pool);
    let page = queries
        .search_page_optimized(&params.condition(), params.page_request())
        .await?;

    Ok(Json(page))
}

/// Create a new member, optionally inside an existing team
///
/// POST /api/members
pub async fn create_member(
    State(pool): State<SqlitePool>,
    Json(req): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let team = match req.team_id {
        Some(team_id) => Some(
            SqliteTeamRepository::new(pool.clone())
                .find_by_id(team_id)
                .await?
                .ok_or_else(|| ApiError::bad_request(format!("Team not found: {}", team_id)))?,
        ),
        None => None,
    };

    let member = Member::new(req.username, req.age, team.as_ref());
    let member_repo = SqliteMemberRepository::new(pool);
    member_repo.save(&member).await?;

    Ok((StatusCode::CREATED, Json(MemberResponse::from(&member))))
}

/// Get a member by ID
///
/// GET /api/members/:id
pub async fn get_member(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberResponse>, ApiError> {
    let member_repo = SqliteMemberRepository::new(pool);
    let member = member_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Member not found: {}", id)))?;

    Ok(Json(MemberResponse::from(&member)))
}

/// Delete a member
///
/// DELETE /api/members/:id
pub async fn delete_member(
    State(pool): State<SqlitePool>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let member_repo = SqliteMemberRepository::new(pool);
    member_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_split_into_condition_and_page() {
        let params = MemberSearchParams {
            team_name: Some("teamB".to_string()),
            age_goe: Some(35),
            page: Some(1),
            size: Some(5),
            ..Default::default()
        };

        let condition = params.condition();
        assert_eq!(condition.team_name.as_deref(), Some("teamB"));
        assert_eq!(condition.age_goe, Some(35));
        assert_eq!(params.page_request().offset(), 5);
    }
}
