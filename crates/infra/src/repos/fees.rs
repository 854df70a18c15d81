use sqlx::{Executor, Postgres, Result as SqlxResult};

use crate::{db::Db, models::FeeRow};

#[derive(Clone)]
pub struct FeeRepo {
    pool: Db,
}

impl FeeRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn get(&self, club_id: &str) -> SqlxResult<Option<FeeRow>> {
        sqlx::query_as::<_, FeeRow>("SELECT club_id, fee, updated_at FROM fees WHERE club_id = $1")
            .bind(club_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Running total for a club, 0 when no row exists yet.
    pub async fn total(&self, club_id: &str) -> SqlxResult<i32> {
        Ok(self.get(club_id).await?.map(|row| row.fee).unwrap_or(0))
    }
}

/// Atomically add `delta` to the club's ledger row, creating it if needed.
/// The total never goes below zero. Returns the new total.
pub async fn adjust<'e, E>(executor: E, club_id: &str, delta: i32) -> SqlxResult<i32>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO fees (club_id, fee)
        VALUES ($1, GREATEST($2, 0))
        ON CONFLICT (club_id) DO UPDATE SET
            fee = GREATEST(fees.fee + $2, 0),
            updated_at = NOW()
        RETURNING fee
        "#,
    )
    .bind(club_id)
    .bind(delta)
    .fetch_one(executor)
    .await
}
