//! Member registry endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    ident,
    models::member::{CreateMember, Member, MemberQuery, MemberStatus},
    AppState,
};

/// Member with their display identifier
#[derive(Serialize, ToSchema)]
pub struct MemberResponse {
    /// Prefixed display identifier (mem007)
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub membership_date: DateTime<Utc>,
    pub status: MemberStatus,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: ident::format_member_id(member.id),
            name: member.name,
            email: member.email,
            phone: member.phone,
            address: member.address,
            membership_date: member.membership_date,
            status: member.status,
        }
    }
}

/// List members
#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    params(MemberQuery),
    responses(
        (status = 200, description = "Matching members", body = Vec<MemberResponse>)
    )
)]
pub async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<MemberQuery>,
) -> AppResult<Json<Vec<MemberResponse>>> {
    let members = state.services.members.search(&query).await?;
    Ok(Json(members.into_iter().map(Into::into).collect()))
}

/// Register a new member
#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body = CreateMember,
    responses(
        (status = 201, description = "Member registered", body = MemberResponse),
        (status = 400, description = "Invalid member details")
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    Json(request): Json<CreateMember>,
) -> AppResult<(StatusCode, Json<MemberResponse>)> {
    let member = state.services.members.register(request).await?;
    Ok((StatusCode::CREATED, Json(member.into())))
}

/// Get a member by their identifier
#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    params(("id" = String, Path, description = "Member identifier, prefixed or raw")),
    responses(
        (status = 200, description = "Member found", body = MemberResponse),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MemberResponse>> {
    let id = ident::parse_id(&id)?;
    let member = state.services.members.get(id).await?;
    Ok(Json(member.into()))
}
