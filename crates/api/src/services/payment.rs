use std::sync::Arc;

use portal_infra::models::ClubRow;
use portal_infra::store::{RegistrationStore, StoreError};
use serde::Serialize;
use tracing::info;

use crate::error::AppError;

const ALREADY_CONFIRMED: &str = "Payment has already been confirmed for this club.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    None,
    Pending,
    Completed,
}

impl PaymentStatus {
    fn from_row(status: &str) -> Self {
        match status {
            "completed" => PaymentStatus::Completed,
            _ => PaymentStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentSummary {
    pub club_id: String,
    pub club_name: String,
    /// Current ledger total, or the snapshot taken at confirmation.
    pub fee: i32,
    pub status: PaymentStatus,
    pub can_confirm: bool,
}

#[derive(Clone)]
pub struct PaymentService {
    store: Arc<dyn RegistrationStore>,
}

impl PaymentService {
    pub fn new(store: Arc<dyn RegistrationStore>) -> Self {
        Self { store }
    }

    pub async fn summary(&self, club: &ClubRow) -> Result<PaymentSummary, AppError> {
        let summary = match self.store.get_payment(&club.club_id).await? {
            Some(row) => PaymentSummary {
                club_id: row.club_id,
                club_name: row.club_name,
                fee: row.fee,
                status: PaymentStatus::from_row(&row.status),
                can_confirm: false,
            },
            None => PaymentSummary {
                club_id: club.club_id.clone(),
                club_name: club.name.clone(),
                fee: self.store.fee_total(&club.club_id).await?,
                status: PaymentStatus::None,
                can_confirm: true,
            },
        };
        Ok(summary)
    }

    /// Record the club's confirmation with a snapshot of the current fee.
    /// Only the first confirmation is accepted.
    pub async fn confirm(&self, club: &ClubRow) -> Result<PaymentSummary, AppError> {
        if self.store.get_payment(&club.club_id).await?.is_some() {
            return Err(AppError::Conflict(ALREADY_CONFIRMED.to_string()));
        }

        let fee = self.store.fee_total(&club.club_id).await?;
        let row = self
            .store
            .confirm_payment(&club.club_id, &club.name, fee)
            .await
            .map_err(|err| match err {
                StoreError::Duplicate(_) => AppError::Conflict(ALREADY_CONFIRMED.to_string()),
                other => other.into(),
            })?;

        info!(club_id = %row.club_id, fee = row.fee, "payment confirmed");
        Ok(PaymentSummary {
            club_id: row.club_id,
            club_name: row.club_name,
            fee: row.fee,
            status: PaymentStatus::from_row(&row.status),
            can_confirm: false,
        })
    }
}
