//! Spreadsheet mirror of the registration data.
//!
//! - a1: column bands and A1 range notation
//! - google: Google Sheets v4 client authenticated as a service account
//! - memory: in-process spreadsheet used by tests
//! - mirror: band-level append/update/delete and the Age Categories sheet

pub mod a1;
pub mod google;
pub mod memory;
pub mod mirror;

use async_trait::async_trait;

pub use a1::{A1Range, Band};
pub use google::GoogleSheets;
pub use memory::MemorySheets;
pub use mirror::SheetMirror;

/// Template sheet copied for every new club.
pub const TEMPLATE_SHEET: &str = "Sheet1";
pub const AGE_CATEGORIES_SHEET: &str = "Age Categories";

#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("service account token: {0}")]
    Auth(String),
    #[error("Sheet \"{0}\" not found")]
    SheetNotFound(String),
    #[error("ID number {id_number} not found in sheet \"{sheet}\"")]
    RowNotFound { sheet: String, id_number: String },
    #[error("Age must be between 4-15 years for age categories")]
    AgeOutOfRange,
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

pub type SheetsResult<T> = Result<T, SheetsError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub sheet_id: i64,
    pub title: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

/// Formatting applied to a block of cells. Rows and columns are zero-based
/// and end-exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct CellFormat {
    pub rows: (u32, u32),
    pub columns: (u32, u32),
    pub background: Rgb,
    pub bold: bool,
    pub font_size: Option<u32>,
    pub centered: bool,
}

/// The subset of the Sheets API the mirror needs.
#[async_trait]
pub trait SheetsApi: Send + Sync {
    async fn sheets(&self) -> SheetsResult<Vec<SheetInfo>>;
    async fn add_sheet(&self, title: &str) -> SheetsResult<SheetInfo>;
    async fn duplicate_sheet(&self, source_sheet_id: i64, new_title: &str) -> SheetsResult<SheetInfo>;
    async fn set_hidden(&self, sheet_id: i64, hidden: bool) -> SheetsResult<()>;
    async fn format_cells(&self, sheet_id: i64, formats: &[CellFormat]) -> SheetsResult<()>;

    async fn get_values(&self, range: &A1Range) -> SheetsResult<Vec<Vec<String>>>;
    async fn update_values(&self, range: &A1Range, values: Vec<Vec<String>>) -> SheetsResult<()>;
    async fn append_values(&self, range: &A1Range, values: Vec<Vec<String>>) -> SheetsResult<()>;
    async fn clear_values(&self, range: &A1Range) -> SheetsResult<()>;
}
