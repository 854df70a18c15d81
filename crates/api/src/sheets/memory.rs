use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{A1Range, Band, CellFormat, SheetInfo, SheetsApi, SheetsError, SheetsResult, TEMPLATE_SHEET};

struct MemorySheet {
    info: SheetInfo,
    grid: Vec<Vec<String>>,
    formats: Vec<CellFormat>,
}

impl MemorySheet {
    fn cell_mut(&mut self, row: usize, col: usize) -> &mut String {
        if self.grid.len() <= row {
            self.grid.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.grid[row];
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        &mut cells[col]
    }

    fn band_row(&self, row: usize, band: Band) -> Vec<String> {
        let Some(cells) = self.grid.get(row) else {
            return Vec::new();
        };
        let mut out: Vec<String> = (band.start..=band.end())
            .map(|c| cells.get(c as usize).cloned().unwrap_or_default())
            .collect();
        while out.last().is_some_and(|c| c.is_empty()) {
            out.pop();
        }
        out
    }

    /// Zero-based row bounds covered by `range`, clamped to the grid.
    fn row_span(&self, range: &A1Range) -> (usize, usize) {
        match range.rows {
            Some((top, bottom)) => (top.saturating_sub(1) as usize, bottom as usize),
            None => (0, self.grid.len()),
        }
    }
}

#[derive(Default)]
struct Book {
    sheets: Vec<MemorySheet>,
    next_id: i64,
}

impl Book {
    fn by_title(&mut self, title: &str) -> SheetsResult<&mut MemorySheet> {
        self.sheets
            .iter_mut()
            .find(|s| s.info.title == title)
            .ok_or_else(|| SheetsError::Api {
                status: 400,
                message: format!("Unable to parse range: {title}"),
            })
    }

    fn insert(&mut self, title: &str, hidden: bool, grid: Vec<Vec<String>>) -> SheetsResult<SheetInfo> {
        if self.sheets.iter().any(|s| s.info.title == title) {
            return Err(SheetsError::Api {
                status: 400,
                message: format!("A sheet with the name \"{title}\" already exists."),
            });
        }
        self.next_id += 1;
        let info = SheetInfo { sheet_id: self.next_id, title: title.to_string(), hidden };
        self.sheets.push(MemorySheet { info: info.clone(), grid, formats: Vec::new() });
        Ok(info)
    }
}

/// In-process spreadsheet with the same append/update/clear semantics the
/// mirror relies on.
#[derive(Default)]
pub struct MemorySheets {
    book: Mutex<Book>,
    failing: AtomicBool,
}

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// A spreadsheet holding only the hidden club template.
    pub async fn with_template() -> Self {
        let sheets = Self::new();
        let header = vec!["Full Name".to_string(), "ID Number".to_string()];
        sheets
            .book
            .lock()
            .await
            .insert(TEMPLATE_SHEET, true, vec![header])
            .ok();
        sheets
    }

    /// Make every call fail, as when the provider is unreachable.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Non-empty rows of `band`, in sheet order, with row numbers.
    pub async fn band_rows(&self, title: &str, band: Band) -> Vec<(u32, Vec<String>)> {
        let book = self.book.lock().await;
        let Some(sheet) = book.sheets.iter().find(|s| s.info.title == title) else {
            return Vec::new();
        };
        (0..sheet.grid.len())
            .map(|r| (r as u32 + 1, sheet.band_row(r, band)))
            .filter(|(_, row)| !row.is_empty())
            .collect()
    }

    pub async fn format_count(&self, title: &str) -> usize {
        let book = self.book.lock().await;
        book.sheets
            .iter()
            .find(|s| s.info.title == title)
            .map_or(0, |s| s.formats.len())
    }

    fn check(&self) -> SheetsResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SheetsError::Api { status: 503, message: "backend unavailable".into() });
        }
        Ok(())
    }
}

#[async_trait]
impl SheetsApi for MemorySheets {
    async fn sheets(&self) -> SheetsResult<Vec<SheetInfo>> {
        self.check()?;
        let book = self.book.lock().await;
        Ok(book.sheets.iter().map(|s| s.info.clone()).collect())
    }

    async fn add_sheet(&self, title: &str) -> SheetsResult<SheetInfo> {
        self.check()?;
        self.book.lock().await.insert(title, false, Vec::new())
    }

    async fn duplicate_sheet(&self, source_sheet_id: i64, new_title: &str) -> SheetsResult<SheetInfo> {
        self.check()?;
        let mut book = self.book.lock().await;
        let source = book
            .sheets
            .iter()
            .find(|s| s.info.sheet_id == source_sheet_id)
            .ok_or_else(|| SheetsError::Api {
                status: 400,
                message: format!("No sheet with id: {source_sheet_id}"),
            })?;
        let (hidden, grid) = (source.info.hidden, source.grid.clone());
        book.insert(new_title, hidden, grid)
    }

    async fn set_hidden(&self, sheet_id: i64, hidden: bool) -> SheetsResult<()> {
        self.check()?;
        let mut book = self.book.lock().await;
        if let Some(sheet) = book.sheets.iter_mut().find(|s| s.info.sheet_id == sheet_id) {
            sheet.info.hidden = hidden;
        }
        Ok(())
    }

    async fn format_cells(&self, sheet_id: i64, formats: &[CellFormat]) -> SheetsResult<()> {
        self.check()?;
        let mut book = self.book.lock().await;
        if let Some(sheet) = book.sheets.iter_mut().find(|s| s.info.sheet_id == sheet_id) {
            sheet.formats.extend_from_slice(formats);
        }
        Ok(())
    }

    async fn get_values(&self, range: &A1Range) -> SheetsResult<Vec<Vec<String>>> {
        self.check()?;
        let mut book = self.book.lock().await;
        let sheet = book.by_title(&range.sheet)?;
        let (top, bottom) = sheet.row_span(range);
        let mut rows: Vec<Vec<String>> = (top..bottom.min(sheet.grid.len()))
            .map(|r| sheet.band_row(r, range.band))
            .collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        Ok(rows)
    }

    async fn update_values(&self, range: &A1Range, values: Vec<Vec<String>>) -> SheetsResult<()> {
        self.check()?;
        let mut book = self.book.lock().await;
        let sheet = book.by_title(&range.sheet)?;
        let (top, _) = sheet.row_span(range);
        for (offset, row) in values.into_iter().enumerate() {
            for (col, value) in row.into_iter().take(range.band.width as usize).enumerate() {
                *sheet.cell_mut(top + offset, range.band.start as usize + col) = value;
            }
        }
        Ok(())
    }

    async fn append_values(&self, range: &A1Range, values: Vec<Vec<String>>) -> SheetsResult<()> {
        self.check()?;
        let mut book = self.book.lock().await;
        let sheet = book.by_title(&range.sheet)?;
        let next = (0..sheet.grid.len())
            .rev()
            .find(|&r| !sheet.band_row(r, range.band).is_empty())
            .map_or(0, |r| r + 1);
        for (offset, row) in values.into_iter().enumerate() {
            for (col, value) in row.into_iter().take(range.band.width as usize).enumerate() {
                *sheet.cell_mut(next + offset, range.band.start as usize + col) = value;
            }
        }
        Ok(())
    }

    async fn clear_values(&self, range: &A1Range) -> SheetsResult<()> {
        self.check()?;
        let mut book = self.book.lock().await;
        let sheet = book.by_title(&range.sheet)?;
        let (top, bottom) = sheet.row_span(range);
        for row in top..bottom.min(sheet.grid.len()) {
            for col in range.band.start..=range.band.end() {
                if let Some(cell) = sheet.grid[row].get_mut(col as usize) {
                    cell.clear();
                }
            }
        }
        Ok(())
    }
}
