//! Synchronous spreadsheet writes with the flat camelCase bodies of the
//! sheet endpoints. The registration workflow goes through the mirror worker
//! instead; these exist for manual re-sync. Each body names a club the
//! caller must own.

use axum::{extract::State, Extension, Json};
use portal_infra::models::ClubRow;
use serde::{Deserialize, Deserializer, Serialize};

use crate::auth::Claims;
use crate::error::AppError;
use crate::sheets::{Band, SheetMirror};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

const OK: Json<Success> = Json(Success { success: true });

/// Accept a JSON string or number and keep it as text.
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Loose>::deserialize(deserializer)?.map(|value| match value {
        Loose::Text(text) => text,
        Loose::Number(number) => number.to_string(),
    }))
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn require<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, AppError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::BadRequest(message.to_string())),
    }
}

fn mirror(state: &AppState) -> Result<&SheetMirror, AppError> {
    state.sheets().ok_or_else(|| AppError::Sheets {
        message: "Failed to write to Google Sheet".to_string(),
        details: "spreadsheet mirror is not configured".to_string(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSheetBody {
    pub club_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorSheetBody {
    pub old_id_number: Option<String>,
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub id_number: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub age: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub height: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub weight: Option<String>,
    #[serde(alias = "kupDan")]
    pub kup: Option<String>,
    pub events: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub fee: Option<String>,
    pub school_club: Option<String>,
}

impl CompetitorSheetBody {
    fn values(&self) -> Vec<String> {
        vec![
            text(&self.full_name),
            text(&self.id_number),
            text(&self.gender),
            text(&self.dob),
            text(&self.age),
            text(&self.category),
            text(&self.height),
            text(&self.weight),
            text(&self.kup),
            text(&self.events),
            text(&self.school_club),
            text(&self.fee),
        ]
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachSheetBody {
    pub old_id_number: Option<String>,
    pub full_name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub id_number: Option<String>,
    pub tag_type: Option<String>,
    pub school_club: Option<String>,
}

impl CoachSheetBody {
    fn values(&self) -> Vec<String> {
        vec![
            text(&self.full_name),
            text(&self.dob),
            text(&self.gender),
            text(&self.phone_number),
            text(&self.id_number),
            text(&self.tag_type),
            text(&self.school_club),
        ]
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoSheetBody {
    pub old_id_number: Option<String>,
    pub name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub kup: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub id_number: Option<String>,
    pub school_club: Option<String>,
}

impl DemoSheetBody {
    fn values(&self) -> Vec<String> {
        vec![
            text(&self.name),
            text(&self.dob),
            text(&self.gender),
            text(&self.kup),
            text(&self.id_number),
            text(&self.school_club),
        ]
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeCategorySheetBody {
    pub old_id_number: Option<String>,
    pub full_name: Option<String>,
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub id_number: Option<String>,
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub height: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub weight: Option<String>,
    pub club_name: Option<String>,
}

impl AgeCategorySheetBody {
    fn age(&self) -> Result<i32, AppError> {
        require(&self.age, "Age is required")?
            .parse()
            .map_err(|_| AppError::BadRequest("Age must be a whole number".to_string()))
    }

    fn values(&self) -> Vec<String> {
        vec![
            text(&self.full_name),
            text(&self.gender),
            text(&self.id_number),
            text(&self.dob),
            text(&self.age),
            text(&self.height),
            text(&self.weight),
            text(&self.club_name),
        ]
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSheetBody {
    #[serde(default, deserialize_with = "loose_string")]
    pub id_number: Option<String>,
    pub school_club: Option<String>,
}

/// The claimed club, provided the caller owns it.
async fn owned(state: &AppState, claims: &Claims, club_name: &str) -> Result<ClubRow, AppError> {
    state.registration().owned_club_by_name(club_name, &claims.email).await
}

pub async fn create_sheet(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CreateSheetBody>,
) -> Result<Json<Success>, AppError> {
    let club_name = require(&body.club_name, "Club name is required")?;
    owned(&state, &claims, club_name).await?;
    mirror(&state)?.create_club_sheet(club_name).await?;
    Ok(OK)
}

pub async fn add_competitor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CompetitorSheetBody>,
) -> Result<Json<Success>, AppError> {
    let sheet = require(&body.school_club, "School club is required")?;
    require(&body.id_number, "ID number is required")?;
    owned(&state, &claims, sheet).await?;
    mirror(&state)?.append(sheet, Band::COMPETITORS, body.values()).await?;
    Ok(OK)
}

pub async fn update_competitor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CompetitorSheetBody>,
) -> Result<Json<Success>, AppError> {
    let old_id = require(&body.old_id_number, "Old ID number and school club are required")?;
    let sheet = require(&body.school_club, "Old ID number and school club are required")?;
    owned(&state, &claims, sheet).await?;
    mirror(&state)?
        .update(sheet, Band::COMPETITORS, old_id, body.values())
        .await?;
    Ok(OK)
}

pub async fn delete_competitor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<DeleteSheetBody>,
) -> Result<Json<Success>, AppError> {
    delete_in_band(&state, &claims, &body, Band::COMPETITORS).await
}

pub async fn add_coach(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CoachSheetBody>,
) -> Result<Json<Success>, AppError> {
    let sheet = require(&body.school_club, "School club is required")?;
    require(&body.id_number, "ID number is required")?;
    owned(&state, &claims, sheet).await?;
    mirror(&state)?.append(sheet, Band::COACHES, body.values()).await?;
    Ok(OK)
}

pub async fn update_coach(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CoachSheetBody>,
) -> Result<Json<Success>, AppError> {
    let old_id = require(&body.old_id_number, "Old ID number and school club are required")?;
    let sheet = require(&body.school_club, "Old ID number and school club are required")?;
    owned(&state, &claims, sheet).await?;
    mirror(&state)?
        .update(sheet, Band::COACHES, old_id, body.values())
        .await?;
    Ok(OK)
}

pub async fn delete_coach(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<DeleteSheetBody>,
) -> Result<Json<Success>, AppError> {
    delete_in_band(&state, &claims, &body, Band::COACHES).await
}

pub async fn add_demo(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<DemoSheetBody>,
) -> Result<Json<Success>, AppError> {
    let sheet = require(&body.school_club, "School club is required")?;
    require(&body.id_number, "ID number is required")?;
    owned(&state, &claims, sheet).await?;
    mirror(&state)?.append(sheet, Band::DEMO, body.values()).await?;
    Ok(OK)
}

pub async fn update_demo(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<DemoSheetBody>,
) -> Result<Json<Success>, AppError> {
    let sheet = require(&body.school_club, "ID number and school club are required")?;
    let id = match body.old_id_number.as_deref().map(str::trim) {
        Some(old) if !old.is_empty() => old,
        _ => require(&body.id_number, "ID number and school club are required")?,
    };
    owned(&state, &claims, sheet).await?;
    mirror(&state)?.update(sheet, Band::DEMO, id, body.values()).await?;
    Ok(OK)
}

pub async fn delete_demo(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<DeleteSheetBody>,
) -> Result<Json<Success>, AppError> {
    delete_in_band(&state, &claims, &body, Band::DEMO).await
}

pub async fn add_age_category(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<AgeCategorySheetBody>,
) -> Result<Json<Success>, AppError> {
    let id = require(&body.id_number, "ID number is required")?;
    let age = body.age()?;
    let club_name = require(&body.club_name, "Club name is required")?;
    let club = owned(&state, &claims, club_name).await?;
    state.registration().guard_competitor_owner(&club, id).await?;
    mirror(&state)?.append_age_category(age, body.values()).await?;
    Ok(OK)
}

pub async fn update_age_category(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<AgeCategorySheetBody>,
) -> Result<Json<Success>, AppError> {
    let old_id = require(&body.old_id_number, "Old ID number is required")?;
    let age = body.age()?;
    let club_name = require(&body.club_name, "Club name is required")?;
    let club = owned(&state, &claims, club_name).await?;
    state.registration().guard_competitor_owner(&club, old_id).await?;
    if let Some(id) = body.id_number.as_deref() {
        state.registration().guard_competitor_owner(&club, id).await?;
    }
    mirror(&state)?
        .update_age_category(old_id, age, body.values())
        .await?;
    Ok(OK)
}

pub async fn delete_age_category(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<DeleteSheetBody>,
) -> Result<Json<Success>, AppError> {
    let id = require(&body.id_number, "ID number and school club are required")?;
    let club_name = require(&body.school_club, "ID number and school club are required")?;
    let club = owned(&state, &claims, club_name).await?;
    state.registration().guard_competitor_owner(&club, id).await?;
    mirror(&state)?.delete_age_category(id).await?;
    Ok(OK)
}

async fn delete_in_band(
    state: &AppState,
    claims: &Claims,
    body: &DeleteSheetBody,
    band: Band,
) -> Result<Json<Success>, AppError> {
    let id = require(&body.id_number, "ID number and school club are required")?;
    let sheet = require(&body.school_club, "ID number and school club are required")?;
    owned(state, claims, sheet).await?;
    mirror(state)?.delete(sheet, band, id).await?;
    Ok(OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_accepted_as_text() {
        let body: AgeCategorySheetBody = serde_json::from_str(
            r#"{"fullName":"Aina","idNumber":120304,"age":9,"height":"130","clubName":"Tiger"}"#,
        )
        .unwrap();
        assert_eq!(body.id_number.as_deref(), Some("120304"));
        assert_eq!(body.age().unwrap(), 9);
        assert_eq!(body.values()[7], "Tiger");
        assert_eq!(body.values()[6], "");
    }

    #[test]
    fn test_kup_dan_alias() {
        let body: CompetitorSheetBody =
            serde_json::from_str(r#"{"idNumber":"X1","kupDan":"8th Kup","schoolClub":"Tiger"}"#)
                .unwrap();
        assert_eq!(body.values()[8], "8th Kup");
        assert_eq!(body.values()[10], "Tiger");
    }

    #[test]
    fn test_missing_fields_are_bad_requests() {
        let body: DeleteSheetBody = serde_json::from_str(r#"{"idNumber":"  "}"#).unwrap();
        let err = require(&body.id_number, "ID number is required").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
