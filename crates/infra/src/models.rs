use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ClubRow {
    pub id: Uuid,
    pub club_id: String,
    pub name: String,
    pub representative: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub master_name: Option<String>,
    pub address: Option<String>,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CompetitorRow {
    pub id: Uuid,
    pub club_id: String,
    pub club_name: String,
    pub id_number: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub age: i32,
    pub category: String,
    pub gender: String,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub kup: Option<String>,
    pub events: String,
    pub membership_id: Option<String>,
    pub fee: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CoachRow {
    pub id: Uuid,
    pub club_id: String,
    pub club_name: String,
    pub id_number: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub tag_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DemoMemberRow {
    pub id: Uuid,
    pub club_id: String,
    pub id_number: String,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub kup: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FeeRow {
    pub club_id: String,
    pub fee: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaymentRow {
    pub club_id: String,
    pub club_name: String,
    pub fee: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
