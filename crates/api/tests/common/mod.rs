#![allow(dead_code)]

use std::sync::Arc;

use async_graphql::{Request, Variables};
use chrono::NaiveDate;
use portal_api::auth::{Claims, JwtService};
use portal_api::gql::PortalSchema;
use portal_api::services::registration::{ClubInput, CoachInput, CompetitorInput};
use portal_api::services::spawn_mirror_worker;
use portal_api::sheets::{MemorySheets, SheetMirror};
use portal_api::AppState;
use portal_infra::models::ClubRow;
use portal_infra::repos::CreateClub;
use portal_infra::store::{MemoryStore, RegistrationStore};
use tokio::task::JoinHandle;

pub const OWNER: &str = "owner@tiger.my";
pub const RIVAL: &str = "owner@dragon.my";
pub const JWT_SECRET: &str = "test-secret";

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub sheets: Arc<MemorySheets>,
    worker: Option<JoinHandle<()>>,
}

impl TestApp {
    /// Wait for every queued mirror operation to be applied. Consumes the
    /// app so the queue can close.
    pub async fn drain(self) -> Arc<MemorySheets> {
        let TestApp { state, sheets, worker, .. } = self;
        drop(state);
        if let Some(worker) = worker {
            worker.await.expect("mirror worker panicked");
        }
        sheets
    }
}

/// Workflow state on the in-memory store with the mirror disabled.
pub async fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), JwtService::new(JWT_SECRET));
    TestApp {
        state,
        store,
        sheets: Arc::new(MemorySheets::with_template().await),
        worker: None,
    }
}

/// Workflow state with the mirror worker writing to an in-memory
/// spreadsheet. The direct sheet endpoints use the same spreadsheet.
pub async fn test_app_with_mirror() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let sheets = Arc::new(MemorySheets::with_template().await);
    let mirror = SheetMirror::new(sheets.clone());
    let (handle, worker) = spawn_mirror_worker(mirror.clone());
    let state = AppState::new(store.clone(), JwtService::new(JWT_SECRET))
        .with_mirror(handle)
        .with_sheets(mirror);
    TestApp { state, store, sheets, worker: Some(worker) }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

pub fn dob(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn claims(email: &str) -> Claims {
    Claims::new(format!("user-{email}"), email, 1)
}

pub fn bearer(state: &AppState, email: &str) -> String {
    let token = state
        .jwt_service()
        .create_token(&format!("user-{email}"), email)
        .expect("Failed to sign token");
    format!("Bearer {token}")
}

pub fn club_input(name: &str) -> ClubInput {
    ClubInput {
        name: name.to_string(),
        representative: "Master Lee".to_string(),
        email: Some("contact@club.my".to_string()),
        phone_number: Some("012-3456789".to_string()),
        master_name: Some("Lee Chong".to_string()),
        address: None,
    }
}

pub async fn register_club(state: &AppState, owner: &str, name: &str) -> ClubRow {
    state
        .registration()
        .register_club(owner, club_input(name))
        .await
        .expect("Failed to register club")
}

/// Insert a club straight into the store, leaving the spreadsheet alone.
pub async fn seed_club(store: &MemoryStore, club_id: &str, owner: &str, name: &str) -> ClubRow {
    store
        .create_club(CreateClub {
            club_id: club_id.to_string(),
            name: name.to_string(),
            representative: "Master Lee".to_string(),
            email: None,
            phone_number: None,
            master_name: None,
            address: None,
            user_email: owner.to_string(),
        })
        .await
        .expect("Failed to seed club")
}

pub fn competitor(id_number: &str, full_name: &str, date_of_birth: NaiveDate) -> CompetitorInput {
    CompetitorInput {
        id_number: id_number.to_string(),
        full_name: full_name.to_string(),
        date_of_birth,
        gender: "Female".to_string(),
        height: Some("130".to_string()),
        weight: Some("28".to_string()),
        kup: Some("8th Kup".to_string()),
        membership_id: None,
    }
}

pub fn coach(id_number: &str, tag_type: &str) -> CoachInput {
    CoachInput {
        id_number: id_number.to_string(),
        full_name: format!("Coach {id_number}"),
        date_of_birth: Some(dob(1985, 3, 9)),
        gender: Some("Male".to_string()),
        phone_number: Some("019-1112222".to_string()),
        tag_type: tag_type.to_string(),
    }
}

/// Helper function to execute GraphQL queries
pub async fn execute_graphql(
    schema: &PortalSchema,
    query: &str,
    variables: Option<Variables>,
    auth_claims: Option<Claims>,
) -> async_graphql::Response {
    let mut request = Request::new(query);

    if let Some(vars) = variables {
        request = request.variables(vars);
    }

    if let Some(claims) = auth_claims {
        request = request.data(claims);
    }

    schema.execute(request).await
}
