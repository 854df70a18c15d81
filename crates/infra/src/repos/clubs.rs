use crate::{db::Db, models::ClubRow};
use serde::{Deserialize, Serialize};
use sqlx::Result as SqlxResult;

const CLUB_COLUMNS: &str = "id, club_id, name, representative, email, phone_number, \
                            master_name, address, user_email, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClub {
    pub club_id: String,
    pub name: String,
    pub representative: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub master_name: Option<String>,
    pub address: Option<String>,
    pub user_email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateClubDetails {
    pub name: Option<String>,
    pub representative: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub master_name: Option<String>,
    pub address: Option<String>,
}

#[derive(Clone)]
pub struct ClubRepo {
    pool: Db,
}

impl ClubRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn get(&self, club_id: &str) -> SqlxResult<Option<ClubRow>> {
        sqlx::query_as::<_, ClubRow>(&format!(
            "SELECT {CLUB_COLUMNS} FROM clubs WHERE club_id = $1"
        ))
        .bind(club_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_by_user_email(&self, user_email: &str) -> SqlxResult<Option<ClubRow>> {
        sqlx::query_as::<_, ClubRow>(&format!(
            "SELECT {CLUB_COLUMNS} FROM clubs WHERE user_email = $1"
        ))
        .bind(user_email)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_by_name(&self, name: &str) -> SqlxResult<Option<ClubRow>> {
        sqlx::query_as::<_, ClubRow>(&format!(
            "SELECT {CLUB_COLUMNS} FROM clubs WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    /// True when a club already uses this name or belongs to this user.
    pub async fn name_or_owner_taken(&self, name: &str, user_email: &str) -> SqlxResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM clubs WHERE name = $1 OR user_email = $2)",
        )
        .bind(name)
        .bind(user_email)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn create(&self, data: CreateClub) -> SqlxResult<ClubRow> {
        sqlx::query_as::<_, ClubRow>(&format!(
            r#"
            INSERT INTO clubs (club_id, name, representative, email, phone_number,
                               master_name, address, user_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {CLUB_COLUMNS}
            "#
        ))
        .bind(data.club_id)
        .bind(data.name)
        .bind(data.representative)
        .bind(data.email)
        .bind(data.phone_number)
        .bind(data.master_name)
        .bind(data.address)
        .bind(data.user_email)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update_details(
        &self,
        club_id: &str,
        data: UpdateClubDetails,
    ) -> SqlxResult<Option<ClubRow>> {
        sqlx::query_as::<_, ClubRow>(&format!(
            r#"
            UPDATE clubs
            SET name = COALESCE($2, name),
                representative = COALESCE($3, representative),
                email = COALESCE($4, email),
                phone_number = COALESCE($5, phone_number),
                master_name = COALESCE($6, master_name),
                address = COALESCE($7, address),
                updated_at = NOW()
            WHERE club_id = $1
            RETURNING {CLUB_COLUMNS}
            "#
        ))
        .bind(club_id)
        .bind(data.name)
        .bind(data.representative)
        .bind(data.email)
        .bind(data.phone_number)
        .bind(data.master_name)
        .bind(data.address)
        .fetch_optional(&self.pool)
        .await
    }
}
