use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use portal_infra::models::CoachRow;

use super::owned_club;
use crate::auth::Claims;
use crate::error::AppError;
use crate::services::registration::{CoachInput, CoachRoster, CoachUpdateInput};
use crate::state::AppState;

pub async fn roster(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(club_id): Path<String>,
) -> Result<Json<CoachRoster>, AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    Ok(Json(state.registration().coach_roster(&club).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(club_id): Path<String>,
    Json(input): Json<CoachInput>,
) -> Result<(StatusCode, Json<CoachRow>), AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    let row = state.registration().add_coach(&club, input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((club_id, id_number)): Path<(String, String)>,
    Json(input): Json<CoachUpdateInput>,
) -> Result<Json<CoachRow>, AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    Ok(Json(state.registration().update_coach(&club, &id_number, input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((club_id, id_number)): Path<(String, String)>,
) -> Result<Json<CoachRow>, AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    Ok(Json(state.registration().delete_coach(&club, &id_number).await?))
}
