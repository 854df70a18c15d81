use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use portal_infra::models::DemoMemberRow;

use super::owned_club;
use crate::auth::Claims;
use crate::error::AppError;
use crate::services::registration::{
    DemoMemberAdded, DemoMemberInput, DemoMemberRemoved, DemoMemberUpdateInput, DemoTeam,
};
use crate::state::AppState;

pub async fn team(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(club_id): Path<String>,
) -> Result<Json<DemoTeam>, AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    Ok(Json(state.registration().demo_team(&club).await?))
}

pub async fn add(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(club_id): Path<String>,
    Json(input): Json<DemoMemberInput>,
) -> Result<(StatusCode, Json<DemoMemberAdded>), AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    let added = state.registration().add_demo_member(&club, input).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((club_id, id_number)): Path<(String, String)>,
    Json(input): Json<DemoMemberUpdateInput>,
) -> Result<Json<DemoMemberRow>, AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    Ok(Json(
        state.registration().update_demo_member(&club, &id_number, input).await?,
    ))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((club_id, id_number)): Path<(String, String)>,
) -> Result<Json<DemoMemberRemoved>, AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    Ok(Json(state.registration().remove_demo_member(&club, &id_number).await?))
}
