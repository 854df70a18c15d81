use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use portal_infra::models::ClubRow;
use portal_infra::repos::UpdateClubDetails;

use super::owned_club;
use crate::auth::Claims;
use crate::error::AppError;
use crate::services::registration::ClubInput;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<ClubInput>,
) -> Result<(StatusCode, Json<ClubRow>), AppError> {
    let club = state.registration().register_club(&claims.email, input).await?;
    Ok((StatusCode::CREATED, Json(club)))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ClubRow>, AppError> {
    Ok(Json(state.registration().my_club(&claims.email).await?))
}

pub async fn get_club(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(club_id): Path<String>,
) -> Result<Json<ClubRow>, AppError> {
    Ok(Json(owned_club(&state, &claims, &club_id).await?))
}

pub async fn update_details(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(club_id): Path<String>,
    Json(details): Json<UpdateClubDetails>,
) -> Result<Json<ClubRow>, AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    Ok(Json(state.registration().update_club_details(&club, details).await?))
}
