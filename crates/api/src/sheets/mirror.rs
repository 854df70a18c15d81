use std::sync::Arc;

use portal_infra::models::{CoachRow, CompetitorRow, DemoMemberRow};
use portal_infra::rules::AgeCategory;
use tracing::info;

use super::{
    Band, CellFormat, Rgb, SheetInfo, SheetsApi, SheetsError, SheetsResult, AGE_CATEGORIES_SHEET,
    TEMPLATE_SHEET,
};

const AGE_HEADERS: [&str; 8] = ["Name", "Gender", "ID Number", "DOB", "Age", "Height", "Weight", "Club"];
const HEADER_ROW_GREY: Rgb = Rgb { red: 0.9, green: 0.9, blue: 0.9 };

fn bracket_colour(category: AgeCategory) -> Rgb {
    match category {
        AgeCategory::FourToSix => Rgb { red: 0.7, green: 0.9, blue: 0.7 },
        AgeCategory::SevenToNine => Rgb { red: 0.9, green: 0.7, blue: 0.7 },
        AgeCategory::TenToTwelve => Rgb { red: 0.7, green: 0.7, blue: 0.9 },
        AgeCategory::ThirteenToFifteen => Rgb { red: 0.9, green: 0.9, blue: 0.7 },
    }
}

/// One replication step, applied to the spreadsheet in submission order.
#[derive(Debug, Clone, PartialEq)]
pub enum MirrorOp {
    CreateClubSheet { club_name: String },
    Append { sheet: String, band: Band, values: Vec<String> },
    Update { sheet: String, band: Band, old_id_number: String, values: Vec<String> },
    Delete { sheet: String, band: Band, id_number: String },
    AppendAgeCategory { age: i32, values: Vec<String> },
    UpdateAgeCategory { old_id_number: String, age: i32, values: Vec<String> },
    DeleteAgeCategory { id_number: String },
}

impl MirrorOp {
    /// Short name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            MirrorOp::CreateClubSheet { .. } => "create_club_sheet",
            MirrorOp::Append { .. } => "append",
            MirrorOp::Update { .. } => "update",
            MirrorOp::Delete { .. } => "delete",
            MirrorOp::AppendAgeCategory { .. } => "append_age_category",
            MirrorOp::UpdateAgeCategory { .. } => "update_age_category",
            MirrorOp::DeleteAgeCategory { .. } => "delete_age_category",
        }
    }
}

pub fn competitor_values(row: &CompetitorRow) -> Vec<String> {
    vec![
        row.full_name.clone(),
        row.id_number.clone(),
        row.gender.clone(),
        row.date_of_birth.to_string(),
        row.age.to_string(),
        row.category.clone(),
        row.height.clone().unwrap_or_default(),
        row.weight.clone().unwrap_or_default(),
        row.kup.clone().unwrap_or_default(),
        row.events.clone(),
        row.club_name.clone(),
        row.fee.to_string(),
    ]
}

pub fn age_category_values(row: &CompetitorRow) -> Vec<String> {
    vec![
        row.full_name.clone(),
        row.gender.clone(),
        row.id_number.clone(),
        row.date_of_birth.to_string(),
        row.age.to_string(),
        row.height.clone().unwrap_or_default(),
        row.weight.clone().unwrap_or_default(),
        row.club_name.clone(),
    ]
}

pub fn coach_values(row: &CoachRow) -> Vec<String> {
    vec![
        row.full_name.clone(),
        row.date_of_birth.map(|d| d.to_string()).unwrap_or_default(),
        row.gender.clone().unwrap_or_default(),
        row.phone_number.clone().unwrap_or_default(),
        row.id_number.clone(),
        row.tag_type.clone(),
        row.club_name.clone(),
    ]
}

pub fn demo_values(row: &DemoMemberRow, club_name: &str) -> Vec<String> {
    vec![
        row.name.clone(),
        row.date_of_birth.map(|d| d.to_string()).unwrap_or_default(),
        row.gender.clone().unwrap_or_default(),
        row.kup.clone().unwrap_or_default(),
        row.id_number.clone(),
        club_name.to_string(),
    ]
}

fn find_row(rows: &[Vec<String>], band: Band, id_number: &str) -> Option<usize> {
    let id_number = id_number.trim();
    rows.iter().position(|row| {
        row.get(band.id_index)
            .is_some_and(|cell| !cell.trim().is_empty() && cell.trim() == id_number)
    })
}

/// Band-level writes against one spreadsheet.
#[derive(Clone)]
pub struct SheetMirror {
    api: Arc<dyn SheetsApi>,
}

impl SheetMirror {
    pub fn new(api: Arc<dyn SheetsApi>) -> Self {
        Self { api }
    }

    pub async fn apply(&self, op: &MirrorOp) -> SheetsResult<()> {
        match op {
            MirrorOp::CreateClubSheet { club_name } => {
                self.create_club_sheet(club_name).await?;
            }
            MirrorOp::Append { sheet, band, values } => {
                self.append(sheet, *band, values.clone()).await?;
            }
            MirrorOp::Update { sheet, band, old_id_number, values } => {
                self.update(sheet, *band, old_id_number, values.clone()).await?;
            }
            MirrorOp::Delete { sheet, band, id_number } => {
                self.delete(sheet, *band, id_number).await?;
            }
            MirrorOp::AppendAgeCategory { age, values } => {
                self.append_age_category(*age, values.clone()).await?;
            }
            MirrorOp::UpdateAgeCategory { old_id_number, age, values } => {
                self.update_age_category(old_id_number, *age, values.clone()).await?;
            }
            MirrorOp::DeleteAgeCategory { id_number } => {
                self.delete_age_category(id_number).await?;
            }
        }
        Ok(())
    }

    async fn find_sheet(&self, title: &str) -> SheetsResult<Option<SheetInfo>> {
        Ok(self.api.sheets().await?.into_iter().find(|s| s.title == title))
    }

    async fn require_sheet(&self, title: &str) -> SheetsResult<SheetInfo> {
        self.find_sheet(title)
            .await?
            .ok_or_else(|| SheetsError::SheetNotFound(title.to_string()))
    }

    /// Copy the template sheet under the club's name and make it visible.
    pub async fn create_club_sheet(&self, club_name: &str) -> SheetsResult<SheetInfo> {
        let template = self.require_sheet(TEMPLATE_SHEET).await?;
        let mut sheet = self.api.duplicate_sheet(template.sheet_id, club_name).await?;
        self.api.set_hidden(sheet.sheet_id, false).await?;
        sheet.hidden = false;
        info!(club = club_name, sheet_id = sheet.sheet_id, "created club sheet");
        Ok(sheet)
    }

    pub async fn append(&self, sheet: &str, band: Band, values: Vec<String>) -> SheetsResult<()> {
        self.require_sheet(sheet).await?;
        self.api.append_values(&band.range(sheet), vec![values]).await
    }

    /// Overwrite the row whose ID column holds `old_id_number`.
    pub async fn update(
        &self,
        sheet: &str,
        band: Band,
        old_id_number: &str,
        values: Vec<String>,
    ) -> SheetsResult<()> {
        self.require_sheet(sheet).await?;
        let rows = self.api.get_values(&band.range(sheet)).await?;
        let index = find_row(&rows, band, old_id_number).ok_or_else(|| SheetsError::RowNotFound {
            sheet: sheet.to_string(),
            id_number: old_id_number.to_string(),
        })?;
        let row = index as u32 + 1;
        self.api.update_values(&band.rows(sheet, row, row), vec![values]).await
    }

    /// Remove the row holding `id_number` and shift the rows below it up.
    pub async fn delete(&self, sheet: &str, band: Band, id_number: &str) -> SheetsResult<()> {
        self.require_sheet(sheet).await?;
        let rows = self.api.get_values(&band.range(sheet)).await?;
        if !self.delete_in(sheet, band, &rows, id_number).await? {
            return Err(SheetsError::RowNotFound {
                sheet: sheet.to_string(),
                id_number: id_number.to_string(),
            });
        }
        Ok(())
    }

    /// Returns false when the band has no row for `id_number`.
    async fn delete_in(
        &self,
        sheet: &str,
        band: Band,
        rows: &[Vec<String>],
        id_number: &str,
    ) -> SheetsResult<bool> {
        let Some(index) = find_row(rows, band, id_number) else {
            return Ok(false);
        };
        let row = index as u32 + 1;
        let last = rows.len() as u32;
        let remaining = rows[index + 1..].to_vec();

        self.api.clear_values(&band.rows(sheet, row, last)).await?;
        if !remaining.is_empty() {
            let end = row + remaining.len() as u32 - 1;
            self.api.update_values(&band.rows(sheet, row, end), remaining).await?;
        }
        Ok(true)
    }

    /// Create the Age Categories sheet with its headers if it does not exist.
    pub async fn ensure_age_categories(&self) -> SheetsResult<()> {
        if self.find_sheet(AGE_CATEGORIES_SHEET).await?.is_some() {
            return Ok(());
        }
        let sheet = self.api.add_sheet(AGE_CATEGORIES_SHEET).await?;

        let mut formats = Vec::with_capacity(AgeCategory::ALL.len() + 1);
        for category in AgeCategory::ALL {
            let band = Band::age_category(category);
            let mut title = vec![String::new(); band.width as usize];
            title[0] = format!(
                "{} YEARS ({}-{})",
                category.label(),
                band.first_letter(),
                band.last_letter()
            );
            let headers = AGE_HEADERS.iter().map(|h| h.to_string()).collect();

            self.api
                .update_values(&band.rows(AGE_CATEGORIES_SHEET, 1, 2), vec![title, headers])
                .await?;
            formats.push(CellFormat {
                rows: (0, 1),
                columns: (band.start, band.end() + 1),
                background: bracket_colour(category),
                bold: true,
                font_size: Some(12),
                centered: true,
            });
        }

        let last = Band::age_category(AgeCategory::ThirteenToFifteen);
        formats.push(CellFormat {
            rows: (1, 2),
            columns: (0, last.end() + 1),
            background: HEADER_ROW_GREY,
            bold: true,
            font_size: None,
            centered: false,
        });
        self.api.format_cells(sheet.sheet_id, &formats).await?;
        info!("created Age Categories sheet");
        Ok(())
    }

    pub async fn append_age_category(&self, age: i32, values: Vec<String>) -> SheetsResult<()> {
        let category = AgeCategory::for_age(age).ok_or(SheetsError::AgeOutOfRange)?;
        self.ensure_age_categories().await?;
        let band = Band::age_category(category);
        self.api
            .append_values(&band.range(AGE_CATEGORIES_SHEET), vec![values])
            .await
    }

    /// Searches every bracket, since the entry's age may have changed.
    pub async fn delete_age_category(&self, id_number: &str) -> SheetsResult<()> {
        self.require_sheet(AGE_CATEGORIES_SHEET).await?;
        for category in AgeCategory::ALL {
            let band = Band::age_category(category);
            let rows = self.api.get_values(&band.range(AGE_CATEGORIES_SHEET)).await?;
            if self.delete_in(AGE_CATEGORIES_SHEET, band, &rows, id_number).await? {
                return Ok(());
            }
        }
        Err(SheetsError::RowNotFound {
            sheet: AGE_CATEGORIES_SHEET.to_string(),
            id_number: id_number.to_string(),
        })
    }

    /// Delete then append into the bracket for `age`. A missing old entry is
    /// not an error.
    pub async fn update_age_category(
        &self,
        old_id_number: &str,
        age: i32,
        values: Vec<String>,
    ) -> SheetsResult<()> {
        if AgeCategory::for_age(age).is_none() {
            return Err(SheetsError::AgeOutOfRange);
        }
        match self.delete_age_category(old_id_number).await {
            Ok(()) | Err(SheetsError::RowNotFound { .. }) | Err(SheetsError::SheetNotFound(_)) => {}
            Err(err) => return Err(err),
        }
        self.append_age_category(age, values).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::MemorySheets;

    fn row(name: &str, id: &str) -> Vec<String> {
        vec![name.into(), id.into(), "F".into()]
    }

    async fn club_sheet() -> (Arc<MemorySheets>, SheetMirror) {
        let sheets = Arc::new(MemorySheets::with_template().await);
        let mirror = SheetMirror::new(sheets.clone());
        mirror.create_club_sheet("Tiger TKD").await.unwrap();
        (sheets, mirror)
    }

    fn ids(rows: &[(u32, Vec<String>)], band: Band) -> Vec<String> {
        rows.iter().map(|(_, r)| r[band.id_index].clone()).collect()
    }

    #[tokio::test]
    async fn test_create_club_sheet_copies_template_visible() {
        let (sheets, mirror) = club_sheet().await;
        let all = sheets.sheets().await.unwrap();
        let club = all.iter().find(|s| s.title == "Tiger TKD").unwrap();
        assert!(!club.hidden);
        assert!(all.iter().find(|s| s.title == TEMPLATE_SHEET).unwrap().hidden);

        let err = mirror.create_club_sheet("Tiger TKD").await.unwrap_err();
        assert!(matches!(err, SheetsError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_delete_shifts_following_rows_up() {
        let (sheets, mirror) = club_sheet().await;
        for (name, id) in [("Ali", "A1"), ("Bea", "A2"), ("Cai", "A3"), ("Dan", "A4")] {
            mirror.append("Tiger TKD", Band::COMPETITORS, row(name, id)).await.unwrap();
        }

        mirror.delete("Tiger TKD", Band::COMPETITORS, " A2 ").await.unwrap();

        let rows = sheets.band_rows("Tiger TKD", Band::COMPETITORS).await;
        // Row 1 is the template header.
        assert_eq!(rows.len(), 4);
        assert_eq!(rows.iter().map(|(n, _)| *n).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(ids(&rows[1..], Band::COMPETITORS), vec!["A1", "A3", "A4"]);

        let err = mirror.delete("Tiger TKD", Band::COMPETITORS, "A2").await.unwrap_err();
        assert!(matches!(err, SheetsError::RowNotFound { .. }));
    }

    #[tokio::test]
    async fn test_bands_are_independent() {
        let (sheets, mirror) = club_sheet().await;
        mirror.append("Tiger TKD", Band::COMPETITORS, row("Ali", "A1")).await.unwrap();
        let coach = vec!["Coach Lim".into(), "".into(), "M".into(), "012".into(), "K1".into()];
        mirror.append("Tiger TKD", Band::COACHES, coach.clone()).await.unwrap();
        let mut second = coach.clone();
        second[4] = "K2".into();
        mirror.append("Tiger TKD", Band::COACHES, second).await.unwrap();

        mirror.delete("Tiger TKD", Band::COACHES, "K1").await.unwrap();

        let coaches = sheets.band_rows("Tiger TKD", Band::COACHES).await;
        assert_eq!(ids(&coaches, Band::COACHES), vec!["K2"]);
        let competitors = sheets.band_rows("Tiger TKD", Band::COMPETITORS).await;
        assert_eq!(competitors.len(), 2);
    }

    #[tokio::test]
    async fn test_update_rewrites_row_found_by_old_id() {
        let (sheets, mirror) = club_sheet().await;
        mirror.append("Tiger TKD", Band::COMPETITORS, row("Ali", "A1")).await.unwrap();
        mirror.append("Tiger TKD", Band::COMPETITORS, row("Bea", "A2")).await.unwrap();

        mirror
            .update("Tiger TKD", Band::COMPETITORS, "A1", row("Ali Hassan", "Z9"))
            .await
            .unwrap();

        let rows = sheets.band_rows("Tiger TKD", Band::COMPETITORS).await;
        assert_eq!(rows[1].1[0], "Ali Hassan");
        assert_eq!(ids(&rows[1..], Band::COMPETITORS), vec!["Z9", "A2"]);
    }

    #[tokio::test]
    async fn test_missing_club_sheet_is_reported() {
        let sheets = Arc::new(MemorySheets::with_template().await);
        let mirror = SheetMirror::new(sheets);
        let err = mirror
            .append("Nobody", Band::DEMO, vec!["x".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, SheetsError::SheetNotFound(ref s) if s == "Nobody"));
    }

    #[tokio::test]
    async fn test_age_categories_created_once_with_headers() {
        let sheets = Arc::new(MemorySheets::new());
        let mirror = SheetMirror::new(sheets.clone());
        let entry = |id: &str| -> Vec<String> {
            vec!["Kid".into(), "M".into(), id.into(), "2016-01-01".into(), "9".into()]
        };

        mirror.append_age_category(9, entry("A1")).await.unwrap();
        mirror.append_age_category(8, entry("A2")).await.unwrap();
        mirror.append_age_category(14, entry("A3")).await.unwrap();
        assert_eq!(sheets.format_count(AGE_CATEGORIES_SHEET).await, 5);

        let band = Band::age_category(AgeCategory::SevenToNine);
        let rows = sheets.band_rows(AGE_CATEGORIES_SHEET, band).await;
        assert_eq!(rows[0].1[0], "7-9 YEARS (J-Q)");
        assert_eq!(rows[1].1, AGE_HEADERS.map(String::from).to_vec());
        assert_eq!(ids(&rows[2..], band), vec!["A1", "A2"]);

        let teen = Band::age_category(AgeCategory::ThirteenToFifteen);
        let rows = sheets.band_rows(AGE_CATEGORIES_SHEET, teen).await;
        assert_eq!(rows[0].1[0], "13-15 YEARS (AB-AI)");
        assert_eq!(ids(&rows[2..], teen), vec!["A3"]);

        assert!(matches!(
            mirror.append_age_category(16, entry("A4")).await,
            Err(SheetsError::AgeOutOfRange)
        ));
    }

    #[tokio::test]
    async fn test_age_category_update_moves_bracket() {
        let sheets = Arc::new(MemorySheets::new());
        let mirror = SheetMirror::new(sheets.clone());
        let entry = |id: &str, age: &str| -> Vec<String> {
            vec!["Kid".into(), "M".into(), id.into(), "".into(), age.into()]
        };
        mirror.append_age_category(9, entry("A1", "9")).await.unwrap();
        mirror.append_age_category(9, entry("A2", "9")).await.unwrap();

        mirror.update_age_category("A1", 10, entry("A1", "10")).await.unwrap();

        let seven = Band::age_category(AgeCategory::SevenToNine);
        let ten = Band::age_category(AgeCategory::TenToTwelve);
        let rows = sheets.band_rows(AGE_CATEGORIES_SHEET, seven).await;
        assert_eq!(ids(&rows[2..], seven), vec!["A2"]);
        let rows = sheets.band_rows(AGE_CATEGORIES_SHEET, ten).await;
        assert_eq!(ids(&rows[2..], ten), vec!["A1"]);

        assert!(matches!(
            mirror.delete_age_category("nope").await,
            Err(SheetsError::RowNotFound { .. })
        ));
    }
}
