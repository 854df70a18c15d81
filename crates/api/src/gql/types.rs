use async_graphql::{Enum, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use portal_infra::models::{ClubRow, CoachRow, CompetitorRow, DemoMemberRow};

use crate::gql::scalars::Money;
use crate::services::registration::{CoachRoster as CoachRosterView, DemoTeam as DemoTeamView};
use crate::services::{PaymentStatus as ServicePaymentStatus, PaymentSummary};

#[derive(SimpleObject, Clone)]
pub struct Club {
    pub id: ID,
    pub club_id: String,
    pub name: String,
    pub representative: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub master_name: Option<String>,
    pub address: Option<String>,
    pub total_fee: Money,
    pub created_at: DateTime<Utc>,
}

impl Club {
    pub fn from_row(row: ClubRow, total_fee: i32) -> Self {
        Self {
            id: row.id.into(),
            club_id: row.club_id,
            name: row.name,
            representative: row.representative,
            email: row.email,
            phone_number: row.phone_number,
            master_name: row.master_name,
            address: row.address,
            total_fee: Money(total_fee),
            created_at: row.created_at,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Competitor {
    pub id: ID,
    pub id_number: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub age: i32,
    pub category: String,
    pub gender: String,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub kup: Option<String>,
    /// Comma-joined, e.g. "pattern, sparring".
    pub events: String,
    pub membership_id: Option<String>,
    pub fee: Money,
}

impl From<CompetitorRow> for Competitor {
    fn from(r: CompetitorRow) -> Self {
        Self {
            id: r.id.into(),
            id_number: r.id_number,
            full_name: r.full_name,
            date_of_birth: r.date_of_birth,
            age: r.age,
            category: r.category,
            gender: r.gender,
            height: r.height,
            weight: r.weight,
            kup: r.kup,
            events: r.events,
            membership_id: r.membership_id,
            fee: Money(r.fee),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Coach {
    pub id: ID,
    pub id_number: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub tag_type: String,
}

impl From<CoachRow> for Coach {
    fn from(r: CoachRow) -> Self {
        Self {
            id: r.id.into(),
            id_number: r.id_number,
            full_name: r.full_name,
            date_of_birth: r.date_of_birth,
            gender: r.gender,
            phone_number: r.phone_number,
            tag_type: r.tag_type,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct CoachRoster {
    pub coaches: Vec<Coach>,
    pub team_managers: i32,
    pub coach_count: i32,
    pub max_coaches: i32,
    pub can_add: bool,
}

impl From<CoachRosterView> for CoachRoster {
    fn from(r: CoachRosterView) -> Self {
        Self {
            coaches: r.coaches.into_iter().map(Coach::from).collect(),
            team_managers: r.team_managers as i32,
            coach_count: r.coach_count as i32,
            max_coaches: r.max_coaches as i32,
            can_add: r.can_add,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct DemoMember {
    pub id: ID,
    pub id_number: String,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub kup: Option<String>,
}

impl From<DemoMemberRow> for DemoMember {
    fn from(r: DemoMemberRow) -> Self {
        Self {
            id: r.id.into(),
            id_number: r.id_number,
            name: r.name,
            date_of_birth: r.date_of_birth,
            gender: r.gender,
            kup: r.kup,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct DemoTeam {
    pub members: Vec<DemoMember>,
    pub size: i32,
    pub min_size: i32,
    pub max_size: i32,
    pub complete: bool,
    pub team_fee: Money,
}

impl From<DemoTeamView> for DemoTeam {
    fn from(t: DemoTeamView) -> Self {
        Self {
            members: t.members.into_iter().map(DemoMember::from).collect(),
            size: t.size as i32,
            min_size: t.min_size as i32,
            max_size: t.max_size as i32,
            complete: t.complete,
            team_fee: Money(t.team_fee),
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum PaymentStatus {
    None,
    Pending,
    Completed,
}

impl From<ServicePaymentStatus> for PaymentStatus {
    fn from(s: ServicePaymentStatus) -> Self {
        match s {
            ServicePaymentStatus::None => PaymentStatus::None,
            ServicePaymentStatus::Pending => PaymentStatus::Pending,
            ServicePaymentStatus::Completed => PaymentStatus::Completed,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Payment {
    pub club_id: String,
    pub club_name: String,
    pub fee: Money,
    pub status: PaymentStatus,
    pub can_confirm: bool,
}

impl From<PaymentSummary> for Payment {
    fn from(p: PaymentSummary) -> Self {
        Self {
            club_id: p.club_id,
            club_name: p.club_name,
            fee: Money(p.fee),
            status: p.status.into(),
            can_confirm: p.can_confirm,
        }
    }
}
