use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::Result as SqlxResult;

use crate::{
    db::Db,
    models::CoachRow,
    repos::lock_club,
    rules::{CoachCounts, CoachTag, RuleError},
};

const COACH_COLUMNS: &str = "id, club_id, club_name, id_number, full_name, date_of_birth, \
                             gender, phone_number, tag_type, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCoach {
    pub club_id: String,
    pub club_name: String,
    pub id_number: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub tag_type: String,
}

/// Editable coach fields. The tag type is fixed once the entry exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCoach {
    pub id_number: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Clone)]
pub struct CoachRepo {
    pool: Db,
}

impl CoachRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn list_by_club(&self, club_id: &str) -> SqlxResult<Vec<CoachRow>> {
        sqlx::query_as::<_, CoachRow>(&format!(
            "SELECT {COACH_COLUMNS} FROM coaches WHERE club_id = $1 ORDER BY created_at ASC"
        ))
        .bind(club_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, club_id: &str, id_number: &str) -> SqlxResult<Option<CoachRow>> {
        sqlx::query_as::<_, CoachRow>(&format!(
            "SELECT {COACH_COLUMNS} FROM coaches WHERE club_id = $1 AND id_number = $2"
        ))
        .bind(club_id)
        .bind(id_number)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert a roster entry if the club's Team Manager and Coach limits
    /// allow it. The count and the insert share one locked transaction.
    pub async fn create(
        &self,
        data: CreateCoach,
        max_coaches: usize,
    ) -> SqlxResult<Result<CoachRow, RuleError>> {
        let tag = match CoachTag::parse(&data.tag_type) {
            Ok(tag) => tag,
            Err(err) => return Ok(Err(err)),
        };

        let mut tx = self.pool.begin().await?;
        lock_club(&mut tx, "coaches", &data.club_id).await?;

        let tags =
            sqlx::query_scalar::<_, String>("SELECT tag_type FROM coaches WHERE club_id = $1")
                .bind(&data.club_id)
                .fetch_all(&mut *tx)
                .await?;
        let counts = CoachCounts::tally(tags.iter().map(String::as_str));
        if let Err(err) = counts.check_add(tag, max_coaches) {
            return Ok(Err(err));
        }

        let row = sqlx::query_as::<_, CoachRow>(&format!(
            r#"
            INSERT INTO coaches (club_id, club_name, id_number, full_name, date_of_birth,
                                 gender, phone_number, tag_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COACH_COLUMNS}
            "#
        ))
        .bind(data.club_id)
        .bind(data.club_name)
        .bind(data.id_number)
        .bind(data.full_name)
        .bind(data.date_of_birth)
        .bind(data.gender)
        .bind(data.phone_number)
        .bind(data.tag_type)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Ok(row))
    }

    pub async fn update(
        &self,
        club_id: &str,
        id_number: &str,
        data: UpdateCoach,
    ) -> SqlxResult<Option<CoachRow>> {
        sqlx::query_as::<_, CoachRow>(&format!(
            r#"
            UPDATE coaches
            SET id_number = $3,
                full_name = $4,
                date_of_birth = $5,
                gender = $6,
                phone_number = $7,
                updated_at = NOW()
            WHERE club_id = $1 AND id_number = $2
            RETURNING {COACH_COLUMNS}
            "#
        ))
        .bind(club_id)
        .bind(id_number)
        .bind(data.id_number)
        .bind(data.full_name)
        .bind(data.date_of_birth)
        .bind(data.gender)
        .bind(data.phone_number)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, club_id: &str, id_number: &str) -> SqlxResult<Option<CoachRow>> {
        sqlx::query_as::<_, CoachRow>(&format!(
            "DELETE FROM coaches WHERE club_id = $1 AND id_number = $2 RETURNING {COACH_COLUMNS}"
        ))
        .bind(club_id)
        .bind(id_number)
        .fetch_optional(&self.pool)
        .await
    }
}
