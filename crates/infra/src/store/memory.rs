use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CoachAdd, DemoAdd, RegistrationStore, StoreError, StoreResult};
use crate::models::{ClubRow, CoachRow, CompetitorRow, DemoMemberRow, PaymentRow};
use crate::repos::{
    CreateClub, CreateCoach, CreateCompetitor, CreateDemoMember, UpdateClubDetails, UpdateCoach,
    UpdateCompetitor, UpdateDemoMember,
};
use crate::rules::{self, CoachCounts, CoachTag};

#[derive(Default)]
struct Tables {
    clubs: Vec<ClubRow>,
    competitors: Vec<CompetitorRow>,
    coaches: Vec<CoachRow>,
    demo: Vec<DemoMemberRow>,
    fees: HashMap<String, i32>,
    payments: HashMap<String, PaymentRow>,
}

impl Tables {
    /// Same semantics as the ledger upsert: create on first use, floor at 0.
    fn adjust_fee(&mut self, club_id: &str, delta: i32) -> i32 {
        let fee = self.fees.entry(club_id.to_string()).or_insert(0);
        *fee = (*fee + delta).max(0);
        *fee
    }

    fn check_competitor_unique(
        &self,
        id_number: &str,
        full_name: &str,
        date_of_birth: NaiveDate,
        skip: Option<Uuid>,
    ) -> StoreResult<()> {
        let others = self.competitors.iter().filter(|c| Some(c.id) != skip);
        for other in others {
            if other.id_number == id_number {
                return Err(StoreError::Duplicate("competitors_id_number_key".into()));
            }
            if other.full_name == full_name && other.date_of_birth == date_of_birth {
                return Err(StoreError::Duplicate(
                    "competitors_full_name_date_of_birth_key".into(),
                ));
            }
        }
        Ok(())
    }
}

/// In-process [`RegistrationStore`]. One lock guards every table so each
/// call is atomic, like the transactions of the Postgres store.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the status of a payment row, as an operator would out of band.
    pub async fn set_payment_status(&self, club_id: &str, status: &str) {
        if let Some(row) = self.tables.write().await.payments.get_mut(club_id) {
            row.status = status.to_string();
            row.updated_at = Utc::now();
        }
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn get_club(&self, club_id: &str) -> StoreResult<Option<ClubRow>> {
        let tables = self.tables.read().await;
        Ok(tables.clubs.iter().find(|c| c.club_id == club_id).cloned())
    }

    async fn club_for_user(&self, user_email: &str) -> StoreResult<Option<ClubRow>> {
        let tables = self.tables.read().await;
        Ok(tables.clubs.iter().find(|c| c.user_email == user_email).cloned())
    }

    async fn club_by_name(&self, name: &str) -> StoreResult<Option<ClubRow>> {
        let tables = self.tables.read().await;
        Ok(tables.clubs.iter().find(|c| c.name == name).cloned())
    }

    async fn club_name_or_owner_taken(&self, name: &str, user_email: &str) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .clubs
            .iter()
            .any(|c| c.name == name || c.user_email == user_email))
    }

    async fn create_club(&self, data: CreateClub) -> StoreResult<ClubRow> {
        let mut tables = self.tables.write().await;
        for club in &tables.clubs {
            if club.club_id == data.club_id {
                return Err(StoreError::Duplicate("clubs_club_id_key".into()));
            }
            if club.name == data.name {
                return Err(StoreError::Duplicate("clubs_name_key".into()));
            }
            if club.user_email == data.user_email {
                return Err(StoreError::Duplicate("clubs_user_email_key".into()));
            }
        }

        let now = Utc::now();
        let row = ClubRow {
            id: Uuid::new_v4(),
            club_id: data.club_id,
            name: data.name,
            representative: data.representative,
            email: data.email,
            phone_number: data.phone_number,
            master_name: data.master_name,
            address: data.address,
            user_email: data.user_email,
            created_at: now,
            updated_at: now,
        };
        tables.clubs.push(row.clone());
        Ok(row)
    }

    async fn update_club_details(
        &self,
        club_id: &str,
        data: UpdateClubDetails,
    ) -> StoreResult<Option<ClubRow>> {
        let mut tables = self.tables.write().await;
        if let Some(name) = &data.name {
            if tables
                .clubs
                .iter()
                .any(|c| c.club_id != club_id && &c.name == name)
            {
                return Err(StoreError::Duplicate("clubs_name_key".into()));
            }
        }

        let Some(club) = tables.clubs.iter_mut().find(|c| c.club_id == club_id) else {
            return Ok(None);
        };
        if let Some(name) = data.name {
            club.name = name;
        }
        if let Some(representative) = data.representative {
            club.representative = representative;
        }
        if data.email.is_some() {
            club.email = data.email;
        }
        if data.phone_number.is_some() {
            club.phone_number = data.phone_number;
        }
        if data.master_name.is_some() {
            club.master_name = data.master_name;
        }
        if data.address.is_some() {
            club.address = data.address;
        }
        club.updated_at = Utc::now();
        Ok(Some(club.clone()))
    }

    async fn list_competitors(&self, club_id: &str) -> StoreResult<Vec<CompetitorRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .competitors
            .iter()
            .filter(|c| c.club_id == club_id)
            .cloned()
            .collect())
    }

    async fn get_competitor(
        &self,
        club_id: &str,
        id_number: &str,
    ) -> StoreResult<Option<CompetitorRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .competitors
            .iter()
            .find(|c| c.club_id == club_id && c.id_number == id_number)
            .cloned())
    }

    async fn competitors_by_id_number(&self, id_number: &str) -> StoreResult<Vec<CompetitorRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .competitors
            .iter()
            .filter(|c| c.id_number == id_number)
            .cloned()
            .collect())
    }

    async fn competitors_by_name_and_dob(
        &self,
        full_name: &str,
        date_of_birth: NaiveDate,
    ) -> StoreResult<Vec<CompetitorRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .competitors
            .iter()
            .filter(|c| c.full_name == full_name && c.date_of_birth == date_of_birth)
            .cloned()
            .collect())
    }

    async fn register_competitor(&self, data: CreateCompetitor) -> StoreResult<CompetitorRow> {
        let mut tables = self.tables.write().await;
        tables.check_competitor_unique(&data.id_number, &data.full_name, data.date_of_birth, None)?;

        let now = Utc::now();
        let row = CompetitorRow {
            id: Uuid::new_v4(),
            club_id: data.club_id,
            club_name: data.club_name,
            id_number: data.id_number,
            full_name: data.full_name,
            date_of_birth: data.date_of_birth,
            age: data.age,
            category: data.category,
            gender: data.gender,
            height: data.height,
            weight: data.weight,
            kup: data.kup,
            events: data.events,
            membership_id: data.membership_id,
            fee: data.fee,
            created_at: now,
            updated_at: now,
        };
        tables.adjust_fee(&row.club_id, row.fee);
        tables.competitors.push(row.clone());
        Ok(row)
    }

    async fn update_competitor(
        &self,
        club_id: &str,
        id_number: &str,
        data: UpdateCompetitor,
    ) -> StoreResult<Option<CompetitorRow>> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables
            .competitors
            .iter()
            .position(|c| c.club_id == club_id && c.id_number == id_number)
        else {
            return Ok(None);
        };

        let current = tables.competitors[index].id;
        tables.check_competitor_unique(
            &data.id_number,
            &data.full_name,
            data.date_of_birth,
            Some(current),
        )?;

        let competitor = &mut tables.competitors[index];
        let delta = data.fee - competitor.fee;
        competitor.id_number = data.id_number;
        competitor.full_name = data.full_name;
        competitor.date_of_birth = data.date_of_birth;
        competitor.age = data.age;
        competitor.category = data.category;
        competitor.gender = data.gender;
        competitor.height = data.height;
        competitor.weight = data.weight;
        competitor.kup = data.kup;
        competitor.events = data.events;
        competitor.membership_id = data.membership_id;
        competitor.fee = data.fee;
        competitor.updated_at = Utc::now();
        let row = competitor.clone();

        if delta != 0 {
            tables.adjust_fee(club_id, delta);
        }
        Ok(Some(row))
    }

    async fn delete_competitor(
        &self,
        club_id: &str,
        id_number: &str,
    ) -> StoreResult<Option<CompetitorRow>> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables
            .competitors
            .iter()
            .position(|c| c.club_id == club_id && c.id_number == id_number)
        else {
            return Ok(None);
        };
        let row = tables.competitors.remove(index);
        tables.adjust_fee(club_id, -row.fee);
        Ok(Some(row))
    }

    async fn list_coaches(&self, club_id: &str) -> StoreResult<Vec<CoachRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .coaches
            .iter()
            .filter(|c| c.club_id == club_id)
            .cloned()
            .collect())
    }

    async fn get_coach(&self, club_id: &str, id_number: &str) -> StoreResult<Option<CoachRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .coaches
            .iter()
            .find(|c| c.club_id == club_id && c.id_number == id_number)
            .cloned())
    }

    async fn create_coach(&self, data: CreateCoach, max_coaches: usize) -> StoreResult<CoachAdd> {
        let mut tables = self.tables.write().await;
        let tag = match CoachTag::parse(&data.tag_type) {
            Ok(tag) => tag,
            Err(err) => return Ok(CoachAdd::Rejected(err)),
        };
        let roster = tables
            .coaches
            .iter()
            .filter(|c| c.club_id == data.club_id)
            .map(|c| c.tag_type.as_str());
        if let Err(err) = CoachCounts::tally(roster).check_add(tag, max_coaches) {
            return Ok(CoachAdd::Rejected(err));
        }
        if tables
            .coaches
            .iter()
            .any(|c| c.club_id == data.club_id && c.id_number == data.id_number)
        {
            return Err(StoreError::Duplicate("coaches_club_id_id_number_key".into()));
        }

        let now = Utc::now();
        let row = CoachRow {
            id: Uuid::new_v4(),
            club_id: data.club_id,
            club_name: data.club_name,
            id_number: data.id_number,
            full_name: data.full_name,
            date_of_birth: data.date_of_birth,
            gender: data.gender,
            phone_number: data.phone_number,
            tag_type: data.tag_type,
            created_at: now,
            updated_at: now,
        };
        tables.coaches.push(row.clone());
        Ok(CoachAdd::Added(row))
    }

    async fn update_coach(
        &self,
        club_id: &str,
        id_number: &str,
        data: UpdateCoach,
    ) -> StoreResult<Option<CoachRow>> {
        let mut tables = self.tables.write().await;
        if data.id_number != id_number
            && tables
                .coaches
                .iter()
                .any(|c| c.club_id == club_id && c.id_number == data.id_number)
        {
            return Err(StoreError::Duplicate("coaches_club_id_id_number_key".into()));
        }

        let Some(coach) = tables
            .coaches
            .iter_mut()
            .find(|c| c.club_id == club_id && c.id_number == id_number)
        else {
            return Ok(None);
        };
        coach.id_number = data.id_number;
        coach.full_name = data.full_name;
        coach.date_of_birth = data.date_of_birth;
        coach.gender = data.gender;
        coach.phone_number = data.phone_number;
        coach.updated_at = Utc::now();
        Ok(Some(coach.clone()))
    }

    async fn delete_coach(&self, club_id: &str, id_number: &str) -> StoreResult<Option<CoachRow>> {
        let mut tables = self.tables.write().await;
        let index = tables
            .coaches
            .iter()
            .position(|c| c.club_id == club_id && c.id_number == id_number);
        Ok(index.map(|i| tables.coaches.remove(i)))
    }

    async fn list_demo_team(&self, club_id: &str) -> StoreResult<Vec<DemoMemberRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .demo
            .iter()
            .filter(|m| m.club_id == club_id)
            .cloned()
            .collect())
    }

    async fn get_demo_member(
        &self,
        club_id: &str,
        id_number: &str,
    ) -> StoreResult<Option<DemoMemberRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .demo
            .iter()
            .find(|m| m.club_id == club_id && m.id_number == id_number)
            .cloned())
    }

    async fn add_demo_member(&self, data: CreateDemoMember) -> StoreResult<DemoAdd> {
        let mut tables = self.tables.write().await;
        let size = tables.demo.iter().filter(|m| m.club_id == data.club_id).count();
        if rules::check_team_add(size).is_err() {
            return Ok(DemoAdd::TeamFull);
        }
        if tables
            .demo
            .iter()
            .any(|m| m.club_id == data.club_id && m.id_number == data.id_number)
        {
            return Err(StoreError::Duplicate("demo_club_id_id_number_key".into()));
        }

        let now = Utc::now();
        let member = DemoMemberRow {
            id: Uuid::new_v4(),
            club_id: data.club_id,
            id_number: data.id_number,
            name: data.name,
            date_of_birth: data.date_of_birth,
            gender: data.gender,
            kup: data.kup,
            created_at: now,
            updated_at: now,
        };
        let charged = rules::team_fee_on_add(size);
        if charged > 0 {
            tables.adjust_fee(&member.club_id, charged);
        }
        tables.demo.push(member.clone());
        Ok(DemoAdd::Added { member, charged })
    }

    async fn update_demo_member(
        &self,
        club_id: &str,
        id_number: &str,
        data: UpdateDemoMember,
    ) -> StoreResult<Option<DemoMemberRow>> {
        let mut tables = self.tables.write().await;
        let Some(member) = tables
            .demo
            .iter_mut()
            .find(|m| m.club_id == club_id && m.id_number == id_number)
        else {
            return Ok(None);
        };
        member.name = data.name;
        member.date_of_birth = data.date_of_birth;
        member.gender = data.gender;
        member.kup = data.kup;
        member.updated_at = Utc::now();
        Ok(Some(member.clone()))
    }

    async fn remove_demo_member(
        &self,
        club_id: &str,
        id_number: &str,
    ) -> StoreResult<Option<(DemoMemberRow, i32)>> {
        let mut tables = self.tables.write().await;
        let size = tables.demo.iter().filter(|m| m.club_id == club_id).count();
        let Some(index) = tables
            .demo
            .iter()
            .position(|m| m.club_id == club_id && m.id_number == id_number)
        else {
            return Ok(None);
        };
        let member = tables.demo.remove(index);
        let refunded = rules::team_fee_on_remove(size);
        if refunded > 0 {
            tables.adjust_fee(club_id, -refunded);
        }
        Ok(Some((member, refunded)))
    }

    async fn fee_total(&self, club_id: &str) -> StoreResult<i32> {
        let tables = self.tables.read().await;
        Ok(tables.fees.get(club_id).copied().unwrap_or(0))
    }

    async fn get_payment(&self, club_id: &str) -> StoreResult<Option<PaymentRow>> {
        let tables = self.tables.read().await;
        Ok(tables.payments.get(club_id).cloned())
    }

    async fn confirm_payment(
        &self,
        club_id: &str,
        club_name: &str,
        fee: i32,
    ) -> StoreResult<PaymentRow> {
        let mut tables = self.tables.write().await;
        if tables.payments.contains_key(club_id) {
            return Err(StoreError::Duplicate("payment_pkey".into()));
        }
        let now = Utc::now();
        let row = PaymentRow {
            club_id: club_id.to_string(),
            club_name: club_name.to_string(),
            fee,
            status: "pending".to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.payments.insert(club_id.to_string(), row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleError;

    fn competitor(club_id: &str, id_number: &str, name: &str, fee: i32) -> CreateCompetitor {
        CreateCompetitor {
            club_id: club_id.to_string(),
            club_name: format!("{club_id} TKD"),
            id_number: id_number.to_string(),
            full_name: name.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2016, 4, 2).unwrap(),
            age: 9,
            category: "7-9".to_string(),
            gender: "Male".to_string(),
            height: None,
            weight: None,
            kup: Some("8".to_string()),
            events: "pattern, sparring".to_string(),
            membership_id: None,
            fee,
        }
    }

    fn member(club_id: &str, id_number: &str) -> CreateDemoMember {
        CreateDemoMember {
            club_id: club_id.to_string(),
            id_number: id_number.to_string(),
            name: format!("member {id_number}"),
            date_of_birth: None,
            gender: None,
            kup: None,
        }
    }

    fn coach(club_id: &str, id_number: &str, tag: &str) -> CreateCoach {
        CreateCoach {
            club_id: club_id.to_string(),
            club_name: format!("{club_id} TKD"),
            id_number: id_number.to_string(),
            full_name: format!("coach {id_number}"),
            date_of_birth: None,
            gender: None,
            phone_number: None,
            tag_type: tag.to_string(),
        }
    }

    #[tokio::test]
    async fn test_coach_limits_checked_on_insert() {
        let store = MemoryStore::new();
        let added = store.create_coach(coach("C1", "M1", "Team Manager"), 3).await.unwrap();
        assert!(matches!(added, CoachAdd::Added(_)));
        assert!(matches!(
            store.create_coach(coach("C1", "M2", "Team Manager"), 3).await.unwrap(),
            CoachAdd::Rejected(RuleError::TeamManagerLimit)
        ));

        for id in ["K1", "K2", "K3"] {
            let outcome = store.create_coach(coach("C1", id, "Coach"), 3).await.unwrap();
            assert!(matches!(outcome, CoachAdd::Added(_)), "{id}");
        }
        assert!(matches!(
            store.create_coach(coach("C1", "K4", "Coach"), 3).await.unwrap(),
            CoachAdd::Rejected(RuleError::CoachLimit(3))
        ));

        let other = store.create_coach(coach("C2", "K4", "Coach"), 3).await.unwrap();
        assert!(matches!(other, CoachAdd::Added(_)));
        assert_eq!(store.list_coaches("C1").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_competitor_ledger_tracks_register_update_delete() {
        let store = MemoryStore::new();
        store.register_competitor(competitor("C1", "A1", "Ali", 110)).await.unwrap();
        store.register_competitor(competitor("C1", "A2", "Bea", 100)).await.unwrap();
        assert_eq!(store.fee_total("C1").await.unwrap(), 210);

        let mut update = competitor("C1", "A3", "Ali", 100);
        update.membership_id = Some("M-7".into());
        let update = UpdateCompetitor {
            id_number: update.id_number,
            full_name: update.full_name,
            date_of_birth: update.date_of_birth,
            age: update.age,
            category: update.category,
            gender: update.gender,
            height: update.height,
            weight: update.weight,
            kup: update.kup,
            events: update.events,
            membership_id: update.membership_id,
            fee: update.fee,
        };
        let updated = store.update_competitor("C1", "A1", update).await.unwrap().unwrap();
        assert_eq!(updated.id_number, "A3");
        assert_eq!(store.fee_total("C1").await.unwrap(), 200);
        assert!(store.get_competitor("C1", "A1").await.unwrap().is_none());

        store.delete_competitor("C1", "A3").await.unwrap().unwrap();
        assert_eq!(store.fee_total("C1").await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_duplicate_competitor_leaves_ledger_untouched() {
        let store = MemoryStore::new();
        store.register_competitor(competitor("C1", "A1", "Ali", 110)).await.unwrap();

        let err = store
            .register_competitor(competitor("C2", "A1", "Someone Else", 110))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(ref c) if c == "competitors_id_number_key"));

        let err = store
            .register_competitor(competitor("C2", "B9", "Ali", 110))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        assert_eq!(store.fee_total("C2").await.unwrap(), 0);
        assert!(store.list_competitors("C2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_demo_fee_charged_once_and_refunded_on_last() {
        let store = MemoryStore::new();
        for id in ["A1", "A2", "A3", "A4", "A5"] {
            let outcome = store.add_demo_member(member("C1", id)).await.unwrap();
            let DemoAdd::Added { charged, .. } = outcome else {
                panic!("team should accept {id}");
            };
            assert_eq!(charged, if id == "A1" { 120 } else { 0 });
        }
        assert_eq!(store.fee_total("C1").await.unwrap(), 120);
        assert!(matches!(
            store.add_demo_member(member("C1", "A6")).await.unwrap(),
            DemoAdd::TeamFull
        ));

        for id in ["A1", "A2", "A3", "A4"] {
            let (_, refunded) = store.remove_demo_member("C1", id).await.unwrap().unwrap();
            assert_eq!(refunded, 0);
        }
        assert_eq!(store.fee_total("C1").await.unwrap(), 120);

        let (_, refunded) = store.remove_demo_member("C1", "A5").await.unwrap().unwrap();
        assert_eq!(refunded, 120);
        assert_eq!(store.fee_total("C1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ledger_never_negative() {
        let store = MemoryStore::new();
        store.add_demo_member(member("C1", "A1")).await.unwrap();
        {
            let mut tables = store.tables.write().await;
            tables.fees.insert("C1".into(), 50);
        }
        store.remove_demo_member("C1", "A1").await.unwrap().unwrap();
        assert_eq!(store.fee_total("C1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_second_payment_confirmation_is_duplicate() {
        let store = MemoryStore::new();
        let row = store.confirm_payment("C1", "Tiger TKD", 330).await.unwrap();
        assert_eq!(row.status, "pending");
        assert!(matches!(
            store.confirm_payment("C1", "Tiger TKD", 330).await,
            Err(StoreError::Duplicate(_))
        ));

        store.set_payment_status("C1", "completed").await;
        assert_eq!(store.get_payment("C1").await.unwrap().unwrap().status, "completed");
    }
}
