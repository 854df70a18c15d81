use sqlx::Result as SqlxResult;

use crate::{db::Db, models::PaymentRow};

const PAYMENT_COLUMNS: &str = "club_id, club_name, fee, status, created_at, updated_at";

#[derive(Clone)]
pub struct PaymentRepo {
    pool: Db,
}

impl PaymentRepo {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    pub async fn get(&self, club_id: &str) -> SqlxResult<Option<PaymentRow>> {
        sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payment WHERE club_id = $1"
        ))
        .bind(club_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Record a pending confirmation with a snapshot of the current fee.
    /// A second confirmation for the same club violates the primary key.
    pub async fn confirm(&self, club_id: &str, club_name: &str, fee: i32) -> SqlxResult<PaymentRow> {
        sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            INSERT INTO payment (club_id, club_name, fee, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(club_id)
        .bind(club_name)
        .bind(fee)
        .fetch_one(&self.pool)
        .await
    }
}
