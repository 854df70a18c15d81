//! The registration workflow: validation, duplicate and capacity guards,
//! primary-store writes with their ledger adjustments, then the spreadsheet
//! mirror.
//!
//! Every check runs before any write, so a rejected submission never touches
//! the store or the ledger. Mirror operations are enqueued only after the
//! store write succeeded.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use portal_infra::models::{ClubRow, CoachRow, CompetitorRow, DemoMemberRow};
use portal_infra::repos::{
    CreateClub, CreateCoach, CreateCompetitor, CreateDemoMember, UpdateClubDetails, UpdateCoach,
    UpdateCompetitor, UpdateDemoMember,
};
use portal_infra::rules::{self, CoachCounts, CoachTag, RuleError};
use portal_infra::store::{CoachAdd, DemoAdd, RegistrationStore, StoreError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::services::mirror::MirrorHandle;
use crate::sheets::mirror::{
    age_category_values, coach_values, competitor_values, demo_values, MirrorOp,
};
use crate::sheets::Band;

const CLUB_TAKEN: &str = "A club with this name or user email is already registered.";
const SAME_CLUB_ID: &str = "You have already registered for this club with this I/C or Passport No.";
const SAME_CLUB_NAME_DOB: &str =
    "A participant with this name and date of birth is already registered for this club.";
const COACH_EXISTS: &str = "A coach with this IC/Passport number already exists for this club.";
const NOT_A_COMPETITOR: &str =
    "PARTICIPANT MUST BE A PART OF AT LEAST 1 INDIVIDUAL EVENT TO TAKE PART IN TEAM DEMONSTRATION.";
const DEMO_MEMBER_EXISTS: &str = "A team member with this IC/Passport number already exists.";
const ON_DEMO_TEAM: &str =
    "This participant is on the team demonstration. Remove them from the team first.";

const CLUB_ID_ATTEMPTS: usize = 10;
const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn other_club_id(club_name: &str) -> String {
    format!(
        "This I/C or Passport No. is already registered with {club_name}. Each participant can only register once."
    )
}

fn other_club_name_dob(club_name: &str) -> String {
    format!(
        "A participant with this name and date of birth is already registered with {club_name}. Each participant can only register once."
    )
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Six random base-36 characters followed by the last four base-36 digits of
/// the millisecond timestamp.
pub fn generate_club_id(rng: &mut impl Rng, now_millis: u64) -> String {
    let mut id: String = (0..6)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    let stamp = to_base36(now_millis);
    let tail = &stamp[stamp.len().saturating_sub(4)..];
    id.push_str(&format!("{tail:0>4}"));
    id
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("Missing required field: {field}")));
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClubInput {
    pub name: String,
    pub representative: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub master_name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompetitorInput {
    pub id_number: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub kup: Option<String>,
    pub membership_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoachInput {
    pub id_number: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub tag_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoachUpdateInput {
    pub id_number: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
}

/// Only the ID number is required; the other fields default to the
/// competitor's own record.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoMemberInput {
    pub id_number: String,
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub kup: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DemoMemberUpdateInput {
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub kup: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoachRoster {
    pub coaches: Vec<CoachRow>,
    pub team_managers: usize,
    pub coach_count: usize,
    pub max_coaches: usize,
    pub can_add: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoTeam {
    pub members: Vec<DemoMemberRow>,
    pub size: usize,
    pub min_size: usize,
    pub max_size: usize,
    pub complete: bool,
    pub team_fee: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoMemberAdded {
    pub member: DemoMemberRow,
    pub fee_charged: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoMemberRemoved {
    pub member: DemoMemberRow,
    pub fee_refunded: i32,
}

#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn RegistrationStore>,
    mirror: MirrorHandle,
    max_coaches: usize,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn RegistrationStore>, mirror: MirrorHandle, max_coaches: usize) -> Self {
        Self { store, mirror, max_coaches }
    }

    // ---- clubs ----

    pub async fn register_club(&self, user_email: &str, input: ClubInput) -> Result<ClubRow, AppError> {
        let name = required(&input.name, "name")?;
        let representative = required(&input.representative, "representative")?;

        if self.store.club_name_or_owner_taken(&name, user_email).await? {
            return Err(AppError::Conflict(CLUB_TAKEN.to_string()));
        }

        let club_id = self.unused_club_id().await?;
        let club = self
            .store
            .create_club(CreateClub {
                club_id,
                name,
                representative,
                email: optional(input.email),
                phone_number: optional(input.phone_number),
                master_name: optional(input.master_name),
                address: optional(input.address),
                user_email: user_email.to_string(),
            })
            .await
            .map_err(|err| match err {
                StoreError::Duplicate(_) => AppError::Conflict(CLUB_TAKEN.to_string()),
                other => other.into(),
            })?;

        info!(club_id = %club.club_id, name = %club.name, "registered club");
        self.mirror.enqueue(MirrorOp::CreateClubSheet { club_name: club.name.clone() });
        Ok(club)
    }

    async fn unused_club_id(&self) -> Result<String, AppError> {
        for _ in 0..CLUB_ID_ATTEMPTS {
            let millis = Utc::now().timestamp_millis().max(0) as u64;
            let candidate = generate_club_id(&mut rand::thread_rng(), millis);
            if self.store.get_club(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(AppError::Internal("could not allocate an unused club id".to_string()))
    }

    pub async fn my_club(&self, user_email: &str) -> Result<ClubRow, AppError> {
        self.store
            .club_for_user(user_email)
            .await?
            .ok_or_else(|| AppError::NotFound("No club is registered for this account.".to_string()))
    }

    /// The club, provided it belongs to `user_email`.
    pub async fn owned_club(&self, club_id: &str, user_email: &str) -> Result<ClubRow, AppError> {
        let club_id = club_id.trim().to_uppercase();
        let club = self
            .store
            .get_club(&club_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Club {club_id} not found")))?;
        if club.user_email != user_email {
            return Err(AppError::Forbidden("You do not manage this club.".to_string()));
        }
        Ok(club)
    }

    /// The club registered under `name`, provided it belongs to `user_email`.
    pub async fn owned_club_by_name(&self, name: &str, user_email: &str) -> Result<ClubRow, AppError> {
        let name = name.trim();
        let club = self
            .store
            .club_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Club {name} not found")))?;
        if club.user_email != user_email {
            return Err(AppError::Forbidden("You do not manage this club.".to_string()));
        }
        Ok(club)
    }

    /// Reject `id_number` when it is registered as a competitor of a club
    /// other than `club`.
    pub async fn guard_competitor_owner(&self, club: &ClubRow, id_number: &str) -> Result<(), AppError> {
        let others = self.store.competitors_by_id_number(id_number.trim()).await?;
        if others.iter().any(|row| row.club_id != club.club_id) {
            return Err(AppError::Forbidden(
                "This participant is registered with another club.".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn update_club_details(
        &self,
        club: &ClubRow,
        details: UpdateClubDetails,
    ) -> Result<ClubRow, AppError> {
        let details = UpdateClubDetails {
            name: optional(details.name),
            representative: optional(details.representative),
            email: optional(details.email),
            phone_number: optional(details.phone_number),
            master_name: optional(details.master_name),
            address: optional(details.address),
        };
        let updated = self
            .store
            .update_club_details(&club.club_id, details)
            .await
            .map_err(|err| match err {
                StoreError::Duplicate(_) => AppError::Conflict(CLUB_TAKEN.to_string()),
                other => other.into(),
            })?
            .ok_or_else(|| AppError::NotFound(format!("Club {} not found", club.club_id)))?;
        info!(club_id = %updated.club_id, "updated club details");
        Ok(updated)
    }

    // ---- competitors ----

    pub async fn competitors(&self, club: &ClubRow) -> Result<Vec<CompetitorRow>, AppError> {
        Ok(self.store.list_competitors(&club.club_id).await?)
    }

    /// Reject an identity already held by another competitor. `skip` is the
    /// row being edited.
    async fn guard_identity(
        &self,
        club: &ClubRow,
        id_number: &str,
        full_name: &str,
        date_of_birth: NaiveDate,
        skip: Option<uuid::Uuid>,
    ) -> Result<(), AppError> {
        let others = |rows: Vec<CompetitorRow>| -> Option<CompetitorRow> {
            rows.into_iter().find(|r| Some(r.id) != skip)
        };

        if let Some(existing) = others(self.store.competitors_by_id_number(id_number).await?) {
            return Err(AppError::Conflict(if existing.club_id == club.club_id {
                SAME_CLUB_ID.to_string()
            } else {
                other_club_id(&existing.club_name)
            }));
        }

        let same_person = self
            .store
            .competitors_by_name_and_dob(full_name, date_of_birth)
            .await?;
        if let Some(existing) = others(same_person) {
            return Err(AppError::Conflict(if existing.club_id == club.club_id {
                SAME_CLUB_NAME_DOB.to_string()
            } else {
                other_club_name_dob(&existing.club_name)
            }));
        }
        Ok(())
    }

    fn competitor_conflict(err: StoreError) -> AppError {
        match err {
            StoreError::Duplicate(constraint) if constraint.contains("full_name") => {
                AppError::Conflict(SAME_CLUB_NAME_DOB.to_string())
            }
            StoreError::Duplicate(_) => AppError::Conflict(SAME_CLUB_ID.to_string()),
            other => other.into(),
        }
    }

    pub async fn add_competitor(
        &self,
        club: &ClubRow,
        input: CompetitorInput,
        today: NaiveDate,
    ) -> Result<CompetitorRow, AppError> {
        let id_number = required(&input.id_number, "id_number")?;
        let full_name = required(&input.full_name, "full_name")?;
        let gender = required(&input.gender, "gender")?;
        let membership_id = optional(input.membership_id);
        let assessment = rules::assess(input.date_of_birth, today, membership_id.as_deref())?;

        self.guard_identity(club, &id_number, &full_name, input.date_of_birth, None)
            .await?;

        let row = self
            .store
            .register_competitor(CreateCompetitor {
                club_id: club.club_id.clone(),
                club_name: club.name.clone(),
                id_number,
                full_name,
                date_of_birth: input.date_of_birth,
                age: assessment.age,
                category: assessment.category.label().to_string(),
                gender,
                height: optional(input.height),
                weight: optional(input.weight),
                kup: optional(input.kup),
                events: assessment.events_label(),
                membership_id,
                fee: assessment.fee,
            })
            .await
            .map_err(Self::competitor_conflict)?;

        info!(club_id = %club.club_id, id_number = %row.id_number, fee = row.fee, "registered competitor");
        self.mirror.enqueue(MirrorOp::Append {
            sheet: club.name.clone(),
            band: Band::COMPETITORS,
            values: competitor_values(&row),
        });
        self.mirror.enqueue(MirrorOp::AppendAgeCategory {
            age: row.age,
            values: age_category_values(&row),
        });
        Ok(row)
    }

    pub async fn update_competitor(
        &self,
        club: &ClubRow,
        old_id_number: &str,
        input: CompetitorInput,
        today: NaiveDate,
    ) -> Result<CompetitorRow, AppError> {
        let existing = self
            .store
            .get_competitor(&club.club_id, old_id_number)
            .await?
            .ok_or_else(|| AppError::NotFound("Competitor not found".to_string()))?;

        let id_number = required(&input.id_number, "id_number")?;
        let full_name = required(&input.full_name, "full_name")?;
        let gender = required(&input.gender, "gender")?;
        let membership_id = optional(input.membership_id);
        let assessment = rules::assess(input.date_of_birth, today, membership_id.as_deref())?;

        if id_number != existing.id_number
            && self
                .store
                .get_demo_member(&club.club_id, &existing.id_number)
                .await?
                .is_some()
        {
            return Err(AppError::Conflict(ON_DEMO_TEAM.to_string()));
        }

        self.guard_identity(club, &id_number, &full_name, input.date_of_birth, Some(existing.id))
            .await?;

        let row = self
            .store
            .update_competitor(
                &club.club_id,
                &existing.id_number,
                UpdateCompetitor {
                    id_number,
                    full_name,
                    date_of_birth: input.date_of_birth,
                    age: assessment.age,
                    category: assessment.category.label().to_string(),
                    gender,
                    height: optional(input.height),
                    weight: optional(input.weight),
                    kup: optional(input.kup),
                    events: assessment.events_label(),
                    membership_id,
                    fee: assessment.fee,
                },
            )
            .await
            .map_err(Self::competitor_conflict)?
            .ok_or_else(|| AppError::NotFound("Competitor not found".to_string()))?;

        info!(
            club_id = %club.club_id,
            old_id_number = %existing.id_number,
            id_number = %row.id_number,
            fee_delta = row.fee - existing.fee,
            "updated competitor"
        );
        self.mirror.enqueue(MirrorOp::Update {
            sheet: club.name.clone(),
            band: Band::COMPETITORS,
            old_id_number: existing.id_number.clone(),
            values: competitor_values(&row),
        });
        self.mirror.enqueue(MirrorOp::UpdateAgeCategory {
            old_id_number: existing.id_number,
            age: row.age,
            values: age_category_values(&row),
        });
        Ok(row)
    }

    pub async fn delete_competitor(
        &self,
        club: &ClubRow,
        id_number: &str,
    ) -> Result<CompetitorRow, AppError> {
        if self
            .store
            .get_demo_member(&club.club_id, id_number)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(ON_DEMO_TEAM.to_string()));
        }

        let row = self
            .store
            .delete_competitor(&club.club_id, id_number)
            .await?
            .ok_or_else(|| AppError::NotFound("Competitor not found".to_string()))?;

        info!(club_id = %club.club_id, id_number = %row.id_number, refund = row.fee, "deleted competitor");
        self.mirror.enqueue(MirrorOp::Delete {
            sheet: club.name.clone(),
            band: Band::COMPETITORS,
            id_number: row.id_number.clone(),
        });
        self.mirror.enqueue(MirrorOp::DeleteAgeCategory { id_number: row.id_number.clone() });
        Ok(row)
    }

    // ---- coaches ----

    pub async fn coach_roster(&self, club: &ClubRow) -> Result<CoachRoster, AppError> {
        let coaches = self.store.list_coaches(&club.club_id).await?;
        let counts = CoachCounts::tally(coaches.iter().map(|c| c.tag_type.as_str()));
        Ok(CoachRoster {
            team_managers: counts.team_managers,
            coach_count: counts.coaches,
            max_coaches: self.max_coaches,
            can_add: counts.can_add(self.max_coaches),
            coaches,
        })
    }

    pub async fn add_coach(&self, club: &ClubRow, input: CoachInput) -> Result<CoachRow, AppError> {
        let id_number = required(&input.id_number, "id_number")?;
        let full_name = required(&input.full_name, "full_name")?;
        let tag = CoachTag::parse(&input.tag_type)?;

        if self.store.get_coach(&club.club_id, &id_number).await?.is_some() {
            return Err(AppError::Conflict(COACH_EXISTS.to_string()));
        }

        let outcome = self
            .store
            .create_coach(
                CreateCoach {
                    club_id: club.club_id.clone(),
                    club_name: club.name.clone(),
                    id_number,
                    full_name,
                    date_of_birth: input.date_of_birth,
                    gender: optional(input.gender),
                    phone_number: optional(input.phone_number),
                    tag_type: tag.as_str().to_string(),
                },
                self.max_coaches,
            )
            .await
            .map_err(|err| match err {
                StoreError::Duplicate(_) => AppError::Conflict(COACH_EXISTS.to_string()),
                other => other.into(),
            })?;
        let row = match outcome {
            CoachAdd::Added(row) => row,
            CoachAdd::Rejected(err) => return Err(err.into()),
        };

        info!(club_id = %club.club_id, id_number = %row.id_number, tag = %row.tag_type, "added coach");
        self.mirror.enqueue(MirrorOp::Append {
            sheet: club.name.clone(),
            band: Band::COACHES,
            values: coach_values(&row),
        });
        Ok(row)
    }

    pub async fn update_coach(
        &self,
        club: &ClubRow,
        old_id_number: &str,
        input: CoachUpdateInput,
    ) -> Result<CoachRow, AppError> {
        let id_number = required(&input.id_number, "id_number")?;
        let full_name = required(&input.full_name, "full_name")?;

        if id_number != old_id_number
            && self.store.get_coach(&club.club_id, &id_number).await?.is_some()
        {
            return Err(AppError::Conflict(COACH_EXISTS.to_string()));
        }

        let row = self
            .store
            .update_coach(
                &club.club_id,
                old_id_number,
                UpdateCoach {
                    id_number,
                    full_name,
                    date_of_birth: input.date_of_birth,
                    gender: optional(input.gender),
                    phone_number: optional(input.phone_number),
                },
            )
            .await
            .map_err(|err| match err {
                StoreError::Duplicate(_) => AppError::Conflict(COACH_EXISTS.to_string()),
                other => other.into(),
            })?
            .ok_or_else(|| AppError::NotFound("Coach not found".to_string()))?;

        info!(club_id = %club.club_id, id_number = %row.id_number, "updated coach");
        self.mirror.enqueue(MirrorOp::Update {
            sheet: club.name.clone(),
            band: Band::COACHES,
            old_id_number: old_id_number.to_string(),
            values: coach_values(&row),
        });
        Ok(row)
    }

    pub async fn delete_coach(&self, club: &ClubRow, id_number: &str) -> Result<CoachRow, AppError> {
        let row = self
            .store
            .delete_coach(&club.club_id, id_number)
            .await?
            .ok_or_else(|| AppError::NotFound("Coach not found".to_string()))?;

        info!(club_id = %club.club_id, id_number = %row.id_number, "deleted coach");
        self.mirror.enqueue(MirrorOp::Delete {
            sheet: club.name.clone(),
            band: Band::COACHES,
            id_number: row.id_number.clone(),
        });
        Ok(row)
    }

    // ---- team demonstration ----

    pub async fn demo_team(&self, club: &ClubRow) -> Result<DemoTeam, AppError> {
        let members = self.store.list_demo_team(&club.club_id).await?;
        let size = members.len();
        Ok(DemoTeam {
            members,
            size,
            min_size: rules::TEAM_DEMO_MIN_SIZE,
            max_size: rules::TEAM_DEMO_MAX_SIZE,
            complete: rules::team_is_complete(size),
            team_fee: rules::TEAM_DEMO_FEE,
        })
    }

    pub async fn add_demo_member(
        &self,
        club: &ClubRow,
        input: DemoMemberInput,
    ) -> Result<DemoMemberAdded, AppError> {
        let id_number = required(&input.id_number, "id_number")?;

        if self.store.get_demo_member(&club.club_id, &id_number).await?.is_some() {
            return Err(AppError::Conflict(DEMO_MEMBER_EXISTS.to_string()));
        }
        let competitor = self
            .store
            .get_competitor(&club.club_id, &id_number)
            .await?
            .ok_or_else(|| AppError::BadRequest(NOT_A_COMPETITOR.to_string()))?;

        let outcome = self
            .store
            .add_demo_member(CreateDemoMember {
                club_id: club.club_id.clone(),
                id_number,
                name: optional(input.name).unwrap_or(competitor.full_name),
                date_of_birth: input.date_of_birth.or(Some(competitor.date_of_birth)),
                gender: optional(input.gender).or(Some(competitor.gender)),
                kup: optional(input.kup).or(competitor.kup),
            })
            .await
            .map_err(|err| match err {
                StoreError::Duplicate(_) => AppError::Conflict(DEMO_MEMBER_EXISTS.to_string()),
                other => other.into(),
            })?;

        let (member, fee_charged) = match outcome {
            DemoAdd::Added { member, charged } => (member, charged),
            DemoAdd::TeamFull => return Err(RuleError::TeamFull.into()),
        };

        info!(club_id = %club.club_id, id_number = %member.id_number, fee_charged, "added team demonstration member");
        self.mirror.enqueue(MirrorOp::Append {
            sheet: club.name.clone(),
            band: Band::DEMO,
            values: demo_values(&member, &club.name),
        });
        Ok(DemoMemberAdded { member, fee_charged })
    }

    pub async fn update_demo_member(
        &self,
        club: &ClubRow,
        id_number: &str,
        input: DemoMemberUpdateInput,
    ) -> Result<DemoMemberRow, AppError> {
        let name = required(&input.name, "name")?;
        let row = self
            .store
            .update_demo_member(
                &club.club_id,
                id_number,
                UpdateDemoMember {
                    name,
                    date_of_birth: input.date_of_birth,
                    gender: optional(input.gender),
                    kup: optional(input.kup),
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Team member not found".to_string()))?;

        info!(club_id = %club.club_id, id_number = %row.id_number, "updated team demonstration member");
        self.mirror.enqueue(MirrorOp::Update {
            sheet: club.name.clone(),
            band: Band::DEMO,
            old_id_number: row.id_number.clone(),
            values: demo_values(&row, &club.name),
        });
        Ok(row)
    }

    pub async fn remove_demo_member(
        &self,
        club: &ClubRow,
        id_number: &str,
    ) -> Result<DemoMemberRemoved, AppError> {
        let (member, fee_refunded) = self
            .store
            .remove_demo_member(&club.club_id, id_number)
            .await?
            .ok_or_else(|| AppError::NotFound("Team member not found".to_string()))?;

        info!(club_id = %club.club_id, id_number = %member.id_number, fee_refunded, "removed team demonstration member");
        self.mirror.enqueue(MirrorOp::Delete {
            sheet: club.name.clone(),
            band: Band::DEMO,
            id_number: member.id_number.clone(),
        });
        Ok(DemoMemberRemoved { member, fee_refunded })
    }

    pub async fn fee_total(&self, club: &ClubRow) -> Result<i32, AppError> {
        Ok(self.store.fee_total(&club.club_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "LOYW3V28");
    }

    #[test]
    fn test_club_id_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = generate_club_id(&mut rng, 1_700_000_000_000);
        assert_eq!(id.len(), 10);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert_eq!(&id[6..], "3V28");

        let short = generate_club_id(&mut rng, 35);
        assert_eq!(&short[6..], "000Z");
    }
}
