use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::api::errors::ApiError;
use crate::domain::member::{
    Member, MemberSearchCondition, MemberSort, MemberSortKey, MemberTeamDto, NewMember,
    PageRequest, PageResponse, SortDirection,
};
use crate::domain::repositories::MemberRepository;
use crate::infrastructure::repositories::PostgresMemberRepository;

/// Default page size when the caller supplies no limit
const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Request body for creating a member
#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i64>,
}

/// Response for member reads
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: i64,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i64>,
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

/// Query parameters for the unpaged search endpoint
///
/// Every filter field is optional; absent parameters add no constraint.
#[derive(Debug, Deserialize)]
pub struct SearchMembersQuery {
    pub username: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
    pub team_name: Option<String>,
    pub sort_by: Option<MemberSortKey>,
    pub order: Option<SortDirection>,
}

/// Query parameters for the paged search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchMembersPageQuery {
    pub username: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
    pub team_name: Option<String>,
    pub sort_by: Option<MemberSortKey>,
    pub order: Option<SortDirection>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

fn sorts_from_params(sort_by: Option<MemberSortKey>, order: Option<SortDirection>) -> Vec<MemberSort> {
    match sort_by {
        Some(key) => vec![MemberSort {
            key,
            direction: order.unwrap_or(SortDirection::Asc),
        }],
        None => Vec::new(),
    }
}

/// Create a new member
///
/// POST /api/members
pub async fn create_member(
    State(pool): State<PgPool>,
    Json(req): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let new_member = NewMember::new(req.username, req.age, req.team_id)?;

    let repo = PostgresMemberRepository::new(pool);
    let member = repo.create(new_member).await?;

    Ok((StatusCode::CREATED, Json(MemberResponse::from(&member))))
}

/// Get a member by ID
///
/// GET /api/members/:id
pub async fn get_member(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Json<MemberResponse>, ApiError> {
    let repo = PostgresMemberRepository::new(pool);
    let member = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("member not found: {}", id)))?;

    Ok(Json(MemberResponse::from(&member)))
}

/// List all members
///
/// GET /api/members
pub async fn list_members(
    State(pool): State<PgPool>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let repo = PostgresMemberRepository::new(pool);
    let members = repo.find_all().await?;

    let responses = members.iter().map(MemberResponse::from).collect();
    Ok(Json(responses))
}

/// Delete a member
///
/// DELETE /api/members/:id
pub async fn delete_member(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = PostgresMemberRepository::new(pool);
    repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Condition-driven member search, joined to teams
///
/// GET /api/members/search
pub async fn search_members(
    State(pool): State<PgPool>,
    Query(query): Query<SearchMembersQuery>,
) -> Result<Json<Vec<MemberTeamDto>>, ApiError> {
    let condition = MemberSearchCondition {
        username: query.username,
        age_goe: query.age_goe,
        age_loe: query.age_loe,
        team_name: query.team_name,
    };
    let sorts = sorts_from_params(query.sort_by, query.order);

    let repo = PostgresMemberRepository::new(pool);
    let rows = repo.search(&condition, &sorts).await?;

    Ok(Json(rows))
}

/// Paged member search with total count
///
/// GET /api/members/search/page
pub async fn search_members_page(
    State(pool): State<PgPool>,
    Query(query): Query<SearchMembersPageQuery>,
) -> Result<Json<PageResponse<MemberTeamDto>>, ApiError> {
    let condition = MemberSearchCondition {
        username: query.username,
        age_goe: query.age_goe,
        age_loe: query.age_loe,
        team_name: query.team_name,
    };
    let sorts = sorts_from_params(query.sort_by, query.order);
    let page = PageRequest::new(
        query.offset.unwrap_or(0),
        query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    )?;

    let repo = PostgresMemberRepository::new(pool);
    let page = repo.search_page(&condition, &sorts, page).await?;

    Ok(Json(page))
}
