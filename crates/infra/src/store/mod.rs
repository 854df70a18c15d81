//! Storage seam for the registration workflow.
//!
//! [`PgStore`] is the production backend built on the repositories.
//! [`MemoryStore`] keeps everything in process and enforces the same
//! uniqueness constraints, so workflow tests run without a database.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{ClubRow, CoachRow, CompetitorRow, DemoMemberRow, PaymentRow};
use crate::repos::{
    CreateClub, CreateCoach, CreateCompetitor, CreateDemoMember, UpdateClubDetails, UpdateCoach,
    UpdateCompetitor, UpdateDemoMember,
};
use crate::rules::RuleError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(sqlx::Error),
    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("duplicate value violates {0}")]
    Duplicate(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.code().as_deref() == Some("23505") {
                let constraint = db.constraint().unwrap_or("unique").to_string();
                return StoreError::Duplicate(constraint);
            }
        }
        StoreError::Db(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of adding a team demonstration member.
#[derive(Debug, Clone)]
pub enum DemoAdd {
    Added { member: DemoMemberRow, charged: i32 },
    TeamFull,
}

/// Outcome of adding a coach or Team Manager.
#[derive(Debug, Clone)]
pub enum CoachAdd {
    Added(CoachRow),
    Rejected(RuleError),
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Cheap round-trip to the backend, used by the health check.
    async fn ping(&self) -> StoreResult<()>;

    async fn get_club(&self, club_id: &str) -> StoreResult<Option<ClubRow>>;
    async fn club_for_user(&self, user_email: &str) -> StoreResult<Option<ClubRow>>;
    async fn club_by_name(&self, name: &str) -> StoreResult<Option<ClubRow>>;
    async fn club_name_or_owner_taken(&self, name: &str, user_email: &str) -> StoreResult<bool>;
    async fn create_club(&self, data: CreateClub) -> StoreResult<ClubRow>;
    async fn update_club_details(
        &self,
        club_id: &str,
        data: UpdateClubDetails,
    ) -> StoreResult<Option<ClubRow>>;

    async fn list_competitors(&self, club_id: &str) -> StoreResult<Vec<CompetitorRow>>;
    async fn get_competitor(&self, club_id: &str, id_number: &str)
        -> StoreResult<Option<CompetitorRow>>;
    async fn competitors_by_id_number(&self, id_number: &str) -> StoreResult<Vec<CompetitorRow>>;
    async fn competitors_by_name_and_dob(
        &self,
        full_name: &str,
        date_of_birth: NaiveDate,
    ) -> StoreResult<Vec<CompetitorRow>>;
    /// Insert and charge the fee to the ledger as one unit.
    async fn register_competitor(&self, data: CreateCompetitor) -> StoreResult<CompetitorRow>;
    /// Rewrite and apply the fee difference to the ledger as one unit.
    async fn update_competitor(
        &self,
        club_id: &str,
        id_number: &str,
        data: UpdateCompetitor,
    ) -> StoreResult<Option<CompetitorRow>>;
    /// Delete and refund the fee as one unit.
    async fn delete_competitor(&self, club_id: &str, id_number: &str)
        -> StoreResult<Option<CompetitorRow>>;

    async fn list_coaches(&self, club_id: &str) -> StoreResult<Vec<CoachRow>>;
    async fn get_coach(&self, club_id: &str, id_number: &str) -> StoreResult<Option<CoachRow>>;
    /// Insert a roster entry unless the club's tag limits are reached. The
    /// limit check and the insert are atomic per club.
    async fn create_coach(&self, data: CreateCoach, max_coaches: usize) -> StoreResult<CoachAdd>;
    async fn update_coach(
        &self,
        club_id: &str,
        id_number: &str,
        data: UpdateCoach,
    ) -> StoreResult<Option<CoachRow>>;
    async fn delete_coach(&self, club_id: &str, id_number: &str) -> StoreResult<Option<CoachRow>>;

    async fn list_demo_team(&self, club_id: &str) -> StoreResult<Vec<DemoMemberRow>>;
    async fn get_demo_member(&self, club_id: &str, id_number: &str)
        -> StoreResult<Option<DemoMemberRow>>;
    /// Add a member, charging the team fee when the team was empty.
    async fn add_demo_member(&self, data: CreateDemoMember) -> StoreResult<DemoAdd>;
    async fn update_demo_member(
        &self,
        club_id: &str,
        id_number: &str,
        data: UpdateDemoMember,
    ) -> StoreResult<Option<DemoMemberRow>>;
    /// Remove a member, refunding the team fee when the team becomes empty.
    /// Returns the removed row and the refunded amount.
    async fn remove_demo_member(
        &self,
        club_id: &str,
        id_number: &str,
    ) -> StoreResult<Option<(DemoMemberRow, i32)>>;

    async fn fee_total(&self, club_id: &str) -> StoreResult<i32>;

    async fn get_payment(&self, club_id: &str) -> StoreResult<Option<PaymentRow>>;
    async fn confirm_payment(
        &self,
        club_id: &str,
        club_name: &str,
        fee: i32,
    ) -> StoreResult<PaymentRow>;
}
