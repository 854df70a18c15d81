use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use portal_infra::models::CompetitorRow;

use super::{owned_club, today};
use crate::auth::Claims;
use crate::error::AppError;
use crate::services::registration::CompetitorInput;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(club_id): Path<String>,
) -> Result<Json<Vec<CompetitorRow>>, AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    Ok(Json(state.registration().competitors(&club).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(club_id): Path<String>,
    Json(input): Json<CompetitorInput>,
) -> Result<(StatusCode, Json<CompetitorRow>), AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    let row = state.registration().add_competitor(&club, input, today()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((club_id, id_number)): Path<(String, String)>,
    Json(input): Json<CompetitorInput>,
) -> Result<Json<CompetitorRow>, AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    let row = state
        .registration()
        .update_competitor(&club, &id_number, input, today())
        .await?;
    Ok(Json(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((club_id, id_number)): Path<(String, String)>,
) -> Result<Json<CompetitorRow>, AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    Ok(Json(state.registration().delete_competitor(&club, &id_number).await?))
}
