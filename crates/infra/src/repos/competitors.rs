use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::Result as SqlxResult;

use crate::{db::Db, models::CompetitorRow, repos::fees};

const COMPETITOR_COLUMNS: &str = "id, club_id, club_name, id_number, full_name, date_of_birth, \
                                  age, category, gender, height, weight, kup, events, \
                                  membership_id, fee, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompetitor {
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
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCompetitor {
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
}

#[derive(Clone)]
pub struct CompetitorRepo {
    pool: Db,
}

impl CompetitorRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn list_by_club(&self, club_id: &str) -> SqlxResult<Vec<CompetitorRow>> {
        sqlx::query_as::<_, CompetitorRow>(&format!(
            "SELECT {COMPETITOR_COLUMNS} FROM competitors WHERE club_id = $1 ORDER BY created_at ASC"
        ))
        .bind(club_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, club_id: &str, id_number: &str) -> SqlxResult<Option<CompetitorRow>> {
        sqlx::query_as::<_, CompetitorRow>(&format!(
            "SELECT {COMPETITOR_COLUMNS} FROM competitors WHERE club_id = $1 AND id_number = $2"
        ))
        .bind(club_id)
        .bind(id_number)
        .fetch_optional(&self.pool)
        .await
    }

    /// Every competitor holding `id_number`, across all clubs.
    pub async fn find_by_id_number(&self, id_number: &str) -> SqlxResult<Vec<CompetitorRow>> {
        sqlx::query_as::<_, CompetitorRow>(&format!(
            "SELECT {COMPETITOR_COLUMNS} FROM competitors WHERE id_number = $1"
        ))
        .bind(id_number)
        .fetch_all(&self.pool)
        .await
    }

    /// Every competitor with this name and date of birth, across all clubs.
    pub async fn find_by_name_and_dob(
        &self,
        full_name: &str,
        date_of_birth: NaiveDate,
    ) -> SqlxResult<Vec<CompetitorRow>> {
        sqlx::query_as::<_, CompetitorRow>(&format!(
            "SELECT {COMPETITOR_COLUMNS} FROM competitors WHERE full_name = $1 AND date_of_birth = $2"
        ))
        .bind(full_name)
        .bind(date_of_birth)
        .fetch_all(&self.pool)
        .await
    }

    /// Insert the competitor and charge its fee to the club ledger in one
    /// transaction.
    pub async fn register(&self, data: CreateCompetitor) -> SqlxResult<CompetitorRow> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, CompetitorRow>(&format!(
            r#"
            INSERT INTO competitors (club_id, club_name, id_number, full_name, date_of_birth,
                                     age, category, gender, height, weight, kup, events,
                                     membership_id, fee)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {COMPETITOR_COLUMNS}
            "#
        ))
        .bind(&data.club_id)
        .bind(data.club_name)
        .bind(data.id_number)
        .bind(data.full_name)
        .bind(data.date_of_birth)
        .bind(data.age)
        .bind(data.category)
        .bind(data.gender)
        .bind(data.height)
        .bind(data.weight)
        .bind(data.kup)
        .bind(data.events)
        .bind(data.membership_id)
        .bind(data.fee)
        .fetch_one(&mut *tx)
        .await?;

        fees::adjust(&mut *tx, &data.club_id, row.fee).await?;
        tx.commit().await?;

        Ok(row)
    }

    /// Rewrite a competitor found by its current id number. A fee change is
    /// applied to the ledger as a difference within the same transaction.
    pub async fn update(
        &self,
        club_id: &str,
        id_number: &str,
        data: UpdateCompetitor,
    ) -> SqlxResult<Option<CompetitorRow>> {
        let mut tx = self.pool.begin().await?;

        let previous_fee = sqlx::query_scalar::<_, i32>(
            "SELECT fee FROM competitors WHERE club_id = $1 AND id_number = $2 FOR UPDATE",
        )
        .bind(club_id)
        .bind(id_number)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(previous_fee) = previous_fee else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, CompetitorRow>(&format!(
            r#"
            UPDATE competitors
            SET id_number = $3,
                full_name = $4,
                date_of_birth = $5,
                age = $6,
                category = $7,
                gender = $8,
                height = $9,
                weight = $10,
                kup = $11,
                events = $12,
                membership_id = $13,
                fee = $14,
                updated_at = NOW()
            WHERE club_id = $1 AND id_number = $2
            RETURNING {COMPETITOR_COLUMNS}
            "#
        ))
        .bind(club_id)
        .bind(id_number)
        .bind(data.id_number)
        .bind(data.full_name)
        .bind(data.date_of_birth)
        .bind(data.age)
        .bind(data.category)
        .bind(data.gender)
        .bind(data.height)
        .bind(data.weight)
        .bind(data.kup)
        .bind(data.events)
        .bind(data.membership_id)
        .bind(data.fee)
        .fetch_one(&mut *tx)
        .await?;

        let delta = row.fee - previous_fee;
        if delta != 0 {
            fees::adjust(&mut *tx, club_id, delta).await?;
        }
        tx.commit().await?;

        Ok(Some(row))
    }

    /// Delete a competitor and refund its fee, floored at zero.
    pub async fn delete(&self, club_id: &str, id_number: &str) -> SqlxResult<Option<CompetitorRow>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, CompetitorRow>(&format!(
            "DELETE FROM competitors WHERE club_id = $1 AND id_number = $2 RETURNING {COMPETITOR_COLUMNS}"
        ))
        .bind(club_id)
        .bind(id_number)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = &row {
            fees::adjust(&mut *tx, club_id, -row.fee).await?;
        }
        tx.commit().await?;

        Ok(row)
    }
}
