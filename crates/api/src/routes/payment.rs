use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::owned_club;
use crate::auth::Claims;
use crate::error::AppError;
use crate::services::PaymentSummary;
use crate::state::AppState;

pub async fn summary(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(club_id): Path<String>,
) -> Result<Json<PaymentSummary>, AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    Ok(Json(state.payments().summary(&club).await?))
}

pub async fn confirm(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(club_id): Path<String>,
) -> Result<Json<PaymentSummary>, AppError> {
    let club = owned_club(&state, &claims, &club_id).await?;
    Ok(Json(state.payments().confirm(&club).await?))
}
