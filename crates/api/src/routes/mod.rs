pub mod clubs;
pub mod coaches;
pub mod competitors;
pub mod demo;
pub mod payment;
pub mod sheets;

use axum::{
    routing::{get, post, put},
    Router,
};
use chrono::{NaiveDate, Utc};
use portal_infra::models::ClubRow;

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

/// Club-scoped registration routes. Every route expects verified
/// [`Claims`] in the request extensions.
pub fn club_routes() -> Router<AppState> {
    Router::new()
        .route("/clubs", post(clubs::register))
        .route("/clubs/me", get(clubs::me))
        .route("/clubs/:club_id", get(clubs::get_club))
        .route("/clubs/:club_id/details", put(clubs::update_details))
        .route(
            "/clubs/:club_id/competitors",
            get(competitors::list).post(competitors::create),
        )
        .route(
            "/clubs/:club_id/competitors/:id_number",
            put(competitors::update).delete(competitors::delete),
        )
        .route(
            "/clubs/:club_id/coaches",
            get(coaches::roster).post(coaches::create),
        )
        .route(
            "/clubs/:club_id/coaches/:id_number",
            put(coaches::update).delete(coaches::delete),
        )
        .route("/clubs/:club_id/demo", get(demo::team).post(demo::add))
        .route(
            "/clubs/:club_id/demo/:id_number",
            put(demo::update).delete(demo::remove),
        )
        .route(
            "/clubs/:club_id/payment",
            get(payment::summary).post(payment::confirm),
        )
}

/// Direct spreadsheet endpoints used for manual re-sync.
pub fn sheet_routes() -> Router<AppState> {
    Router::new()
        .route("/create-sheet", post(sheets::create_sheet))
        .route("/add/add-competitors", post(sheets::add_competitor))
        .route("/add/add-coaches", post(sheets::add_coach))
        .route("/add/add-demo", post(sheets::add_demo))
        .route("/add/add-age-categories", post(sheets::add_age_category))
        .route("/update/update-competitors", post(sheets::update_competitor))
        .route("/update/update-coaches", post(sheets::update_coach))
        .route("/update/update-demo", post(sheets::update_demo))
        .route("/update/update-age-categories", post(sheets::update_age_category))
        .route("/delete/delete-competitors", post(sheets::delete_competitor))
        .route("/delete/delete-coaches", post(sheets::delete_coach))
        .route("/delete/delete-demo", post(sheets::delete_demo))
        .route("/delete/delete-age-categories", post(sheets::delete_age_category))
}

pub(crate) async fn owned_club(
    state: &AppState,
    claims: &Claims,
    club_id: &str,
) -> Result<ClubRow, AppError> {
    state.registration().owned_club(club_id, &claims.email).await
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
