use std::fmt;

use portal_infra::rules::AgeCategory;

/// A fixed group of adjacent columns holding one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// Zero-based index of the first column.
    pub start: u32,
    pub width: u32,
    /// Offset of the ID number column within the band.
    pub id_index: usize,
}

impl Band {
    /// `A:L` in a club sheet.
    pub const COMPETITORS: Band = Band { start: 0, width: 12, id_index: 1 };
    /// `N:T` in a club sheet. Column L holds the competitor fee, so coaches
    /// start after the M spacer.
    pub const COACHES: Band = Band { start: 13, width: 7, id_index: 4 };
    /// `U:Z` in a club sheet.
    pub const DEMO: Band = Band { start: 20, width: 6, id_index: 4 };

    /// Age Categories bands: `A:H`, `J:Q`, `S:Z`, `AB:AI`.
    pub fn age_category(category: AgeCategory) -> Band {
        let start = match category {
            AgeCategory::FourToSix => 0,
            AgeCategory::SevenToNine => 9,
            AgeCategory::TenToTwelve => 18,
            AgeCategory::ThirteenToFifteen => 27,
        };
        Band { start, width: 8, id_index: 2 }
    }

    pub fn end(&self) -> u32 {
        self.start + self.width - 1
    }

    pub fn first_letter(&self) -> String {
        column_letter(self.start)
    }

    pub fn last_letter(&self) -> String {
        column_letter(self.end())
    }

    /// The whole band, every row.
    pub fn range(&self, sheet: &str) -> A1Range {
        A1Range { sheet: sheet.to_string(), band: *self, rows: None }
    }

    /// Rows `first..=last` of the band, 1-based.
    pub fn rows(&self, sheet: &str, first: u32, last: u32) -> A1Range {
        A1Range { sheet: sheet.to_string(), band: *self, rows: Some((first, last)) }
    }
}

/// Zero-based column index to its letter name: 0 is `A`, 26 is `AA`.
pub fn column_letter(index: u32) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Sheet titles are always quoted so names with spaces or punctuation work.
pub fn quote_sheet(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Range {
    pub sheet: String,
    pub band: Band,
    pub rows: Option<(u32, u32)>,
}

impl A1Range {
    /// Form suitable for a URL path segment.
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.to_string()).into_owned()
    }
}

impl fmt::Display for A1Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sheet = quote_sheet(&self.sheet);
        let (first, last) = (self.band.first_letter(), self.band.last_letter());
        match self.rows {
            Some((top, bottom)) => write!(f, "{sheet}!{first}{top}:{last}{bottom}"),
            None => write!(f, "{sheet}!{first}:{last}"),
        }
    }
}
