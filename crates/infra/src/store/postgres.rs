use async_trait::async_trait;
use chrono::NaiveDate;

use super::{CoachAdd, DemoAdd, RegistrationStore, StoreResult};
use crate::db::{self, Db};
use crate::models::{ClubRow, CoachRow, CompetitorRow, DemoMemberRow, PaymentRow};
use crate::repos::{
    ClubRepo, CoachRepo, CompetitorRepo, CreateClub, CreateCoach, CreateCompetitor,
    CreateDemoMember, DemoRepo, FeeRepo, PaymentRepo, UpdateClubDetails, UpdateCoach,
    UpdateCompetitor, UpdateDemoMember,
};

#[derive(Clone)]
pub struct PgStore {
    pool: Db,
    clubs: ClubRepo,
    competitors: CompetitorRepo,
    coaches: CoachRepo,
    demo: DemoRepo,
    fees: FeeRepo,
    payments: PaymentRepo,
}

impl PgStore {
    pub fn new(pool: Db) -> Self {
        Self {
            clubs: ClubRepo::new(pool.clone()),
            competitors: CompetitorRepo::new(pool.clone()),
            coaches: CoachRepo::new(pool.clone()),
            demo: DemoRepo::new(pool.clone()),
            fees: FeeRepo::new(pool.clone()),
            payments: PaymentRepo::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl RegistrationStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(db::ping(&self.pool).await?)
    }

    async fn get_club(&self, club_id: &str) -> StoreResult<Option<ClubRow>> {
        Ok(self.clubs.get(club_id).await?)
    }

    async fn club_for_user(&self, user_email: &str) -> StoreResult<Option<ClubRow>> {
        Ok(self.clubs.get_by_user_email(user_email).await?)
    }

    async fn club_by_name(&self, name: &str) -> StoreResult<Option<ClubRow>> {
        Ok(self.clubs.get_by_name(name).await?)
    }

    async fn club_name_or_owner_taken(&self, name: &str, user_email: &str) -> StoreResult<bool> {
        Ok(self.clubs.name_or_owner_taken(name, user_email).await?)
    }

    async fn create_club(&self, data: CreateClub) -> StoreResult<ClubRow> {
        Ok(self.clubs.create(data).await?)
    }

    async fn update_club_details(
        &self,
        club_id: &str,
        data: UpdateClubDetails,
    ) -> StoreResult<Option<ClubRow>> {
        Ok(self.clubs.update_details(club_id, data).await?)
    }

    async fn list_competitors(&self, club_id: &str) -> StoreResult<Vec<CompetitorRow>> {
        Ok(self.competitors.list_by_club(club_id).await?)
    }

    async fn get_competitor(
        &self,
        club_id: &str,
        id_number: &str,
    ) -> StoreResult<Option<CompetitorRow>> {
        Ok(self.competitors.get(club_id, id_number).await?)
    }

    async fn competitors_by_id_number(&self, id_number: &str) -> StoreResult<Vec<CompetitorRow>> {
        Ok(self.competitors.find_by_id_number(id_number).await?)
    }

    async fn competitors_by_name_and_dob(
        &self,
        full_name: &str,
        date_of_birth: NaiveDate,
    ) -> StoreResult<Vec<CompetitorRow>> {
        Ok(self
            .competitors
            .find_by_name_and_dob(full_name, date_of_birth)
            .await?)
    }

    async fn register_competitor(&self, data: CreateCompetitor) -> StoreResult<CompetitorRow> {
        Ok(self.competitors.register(data).await?)
    }

    async fn update_competitor(
        &self,
        club_id: &str,
        id_number: &str,
        data: UpdateCompetitor,
    ) -> StoreResult<Option<CompetitorRow>> {
        Ok(self.competitors.update(club_id, id_number, data).await?)
    }

    async fn delete_competitor(
        &self,
        club_id: &str,
        id_number: &str,
    ) -> StoreResult<Option<CompetitorRow>> {
        Ok(self.competitors.delete(club_id, id_number).await?)
    }

    async fn list_coaches(&self, club_id: &str) -> StoreResult<Vec<CoachRow>> {
        Ok(self.coaches.list_by_club(club_id).await?)
    }

    async fn get_coach(&self, club_id: &str, id_number: &str) -> StoreResult<Option<CoachRow>> {
        Ok(self.coaches.get(club_id, id_number).await?)
    }

    async fn create_coach(&self, data: CreateCoach, max_coaches: usize) -> StoreResult<CoachAdd> {
        Ok(match self.coaches.create(data, max_coaches).await? {
            Ok(row) => CoachAdd::Added(row),
            Err(err) => CoachAdd::Rejected(err),
        })
    }

    async fn update_coach(
        &self,
        club_id: &str,
        id_number: &str,
        data: UpdateCoach,
    ) -> StoreResult<Option<CoachRow>> {
        Ok(self.coaches.update(club_id, id_number, data).await?)
    }

    async fn delete_coach(&self, club_id: &str, id_number: &str) -> StoreResult<Option<CoachRow>> {
        Ok(self.coaches.delete(club_id, id_number).await?)
    }

    async fn list_demo_team(&self, club_id: &str) -> StoreResult<Vec<DemoMemberRow>> {
        Ok(self.demo.list_by_club(club_id).await?)
    }

    async fn get_demo_member(
        &self,
        club_id: &str,
        id_number: &str,
    ) -> StoreResult<Option<DemoMemberRow>> {
        Ok(self.demo.get(club_id, id_number).await?)
    }

    async fn add_demo_member(&self, data: CreateDemoMember) -> StoreResult<DemoAdd> {
        Ok(match self.demo.add(data).await? {
            Some((member, charged)) => DemoAdd::Added { member, charged },
            None => DemoAdd::TeamFull,
        })
    }

    async fn update_demo_member(
        &self,
        club_id: &str,
        id_number: &str,
        data: UpdateDemoMember,
    ) -> StoreResult<Option<DemoMemberRow>> {
        Ok(self.demo.update(club_id, id_number, data).await?)
    }

    async fn remove_demo_member(
        &self,
        club_id: &str,
        id_number: &str,
    ) -> StoreResult<Option<(DemoMemberRow, i32)>> {
        Ok(self.demo.remove(club_id, id_number).await?)
    }

    async fn fee_total(&self, club_id: &str) -> StoreResult<i32> {
        Ok(self.fees.total(club_id).await?)
    }

    async fn get_payment(&self, club_id: &str) -> StoreResult<Option<PaymentRow>> {
        Ok(self.payments.get(club_id).await?)
    }

    async fn confirm_payment(
        &self,
        club_id: &str,
        club_name: &str,
        fee: i32,
    ) -> StoreResult<PaymentRow> {
        Ok(self.payments.confirm(club_id, club_name, fee).await?)
    }
}
