use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::Result as SqlxResult;

use crate::{
    db::Db,
    models::DemoMemberRow,
    repos::{fees, lock_club},
    rules,
};

const DEMO_COLUMNS: &str =
    "id, club_id, id_number, name, date_of_birth, gender, kup, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDemoMember {
    pub club_id: String,
    pub id_number: String,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub kup: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDemoMember {
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub kup: Option<String>,
}

#[derive(Clone)]
pub struct DemoRepo {
    pool: Db,
}

impl DemoRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn list_by_club(&self, club_id: &str) -> SqlxResult<Vec<DemoMemberRow>> {
        sqlx::query_as::<_, DemoMemberRow>(&format!(
            "SELECT {DEMO_COLUMNS} FROM demo WHERE club_id = $1 ORDER BY created_at ASC"
        ))
        .bind(club_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, club_id: &str, id_number: &str) -> SqlxResult<Option<DemoMemberRow>> {
        sqlx::query_as::<_, DemoMemberRow>(&format!(
            "SELECT {DEMO_COLUMNS} FROM demo WHERE club_id = $1 AND id_number = $2"
        ))
        .bind(club_id)
        .bind(id_number)
        .fetch_optional(&self.pool)
        .await
    }

    /// Add a team member. The team fee is charged when this is the club's
    /// first member; the returned amount is what was charged. Returns `None`
    /// without writing when the team is already full.
    pub async fn add(&self, data: CreateDemoMember) -> SqlxResult<Option<(DemoMemberRow, i32)>> {
        let mut tx = self.pool.begin().await?;
        lock_club(&mut tx, "demo", &data.club_id).await?;

        let size = team_size(&mut tx, &data.club_id).await?;
        if rules::check_team_add(size).is_err() {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, DemoMemberRow>(&format!(
            r#"
            INSERT INTO demo (club_id, id_number, name, date_of_birth, gender, kup)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {DEMO_COLUMNS}
            "#
        ))
        .bind(&data.club_id)
        .bind(data.id_number)
        .bind(data.name)
        .bind(data.date_of_birth)
        .bind(data.gender)
        .bind(data.kup)
        .fetch_one(&mut *tx)
        .await?;

        let charged = rules::team_fee_on_add(size);
        if charged > 0 {
            fees::adjust(&mut *tx, &data.club_id, charged).await?;
        }
        tx.commit().await?;

        Ok(Some((row, charged)))
    }

    pub async fn update(
        &self,
        club_id: &str,
        id_number: &str,
        data: UpdateDemoMember,
    ) -> SqlxResult<Option<DemoMemberRow>> {
        sqlx::query_as::<_, DemoMemberRow>(&format!(
            r#"
            UPDATE demo
            SET name = $3,
                date_of_birth = $4,
                gender = $5,
                kup = $6,
                updated_at = NOW()
            WHERE club_id = $1 AND id_number = $2
            RETURNING {DEMO_COLUMNS}
            "#
        ))
        .bind(club_id)
        .bind(id_number)
        .bind(data.name)
        .bind(data.date_of_birth)
        .bind(data.gender)
        .bind(data.kup)
        .fetch_optional(&self.pool)
        .await
    }

    /// Remove a team member. Removing the last one refunds the team fee;
    /// the returned amount is what was refunded.
    pub async fn remove(
        &self,
        club_id: &str,
        id_number: &str,
    ) -> SqlxResult<Option<(DemoMemberRow, i32)>> {
        let mut tx = self.pool.begin().await?;
        lock_club(&mut tx, "demo", club_id).await?;

        let size = team_size(&mut tx, club_id).await?;

        let row = sqlx::query_as::<_, DemoMemberRow>(&format!(
            "DELETE FROM demo WHERE club_id = $1 AND id_number = $2 RETURNING {DEMO_COLUMNS}"
        ))
        .bind(club_id)
        .bind(id_number)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let refunded = rules::team_fee_on_remove(size);
        if refunded > 0 {
            fees::adjust(&mut *tx, club_id, -refunded).await?;
        }
        tx.commit().await?;

        Ok(Some((row, refunded)))
    }
}

async fn team_size(tx: &mut sqlx::Transaction<'_, sqlx::Postgres>, club_id: &str) -> SqlxResult<usize> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM demo WHERE club_id = $1")
        .bind(club_id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(count as usize)
}
