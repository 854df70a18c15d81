use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use portal_infra::rules::RuleError;
use portal_infra::store::StoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::sheets::SheetsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error")]
    Db(#[from] sqlx::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Spreadsheet provider failure on a synchronous mirror call.
    #[error("{message}")]
    Sheets { message: String, details: String },

    #[error("internal error")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Db(_) | AppError::Sheets { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<RuleError> for AppError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::AgeAboveLimit | RuleError::AgeOutOfRange | RuleError::UnknownTagType(_) => {
                AppError::BadRequest(err.to_string())
            }
            RuleError::TeamManagerLimit | RuleError::CoachLimit(_) | RuleError::TeamFull => {
                AppError::Conflict(err.to_string())
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Db(e) => AppError::Db(e),
            StoreError::Duplicate(constraint) => {
                AppError::Conflict(format!("duplicate value violates {constraint}"))
            }
        }
    }
}

impl From<SheetsError> for AppError {
    fn from(err: SheetsError) -> Self {
        match err {
            SheetsError::SheetNotFound(_) | SheetsError::RowNotFound { .. } => {
                AppError::NotFound(err.to_string())
            }
            SheetsError::AgeOutOfRange => AppError::BadRequest(err.to_string()),
            other => AppError::Sheets {
                message: "Failed to write to Google Sheet".to_string(),
                details: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = match &self {
            AppError::Sheets { details, .. } => Some(details.clone()),
            AppError::Db(e) => {
                error!("database error: {e}");
                None
            }
            AppError::Internal(e) => {
                error!("internal error: {e}");
                None
            }
            _ => None,
        };
        let body = ErrorBody { error: self.to_string(), details };
        (status, Json(body)).into_response()
    }
}
