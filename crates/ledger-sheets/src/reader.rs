//! Header-indexed reading of a sheet

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use ledger_sheets_xlsx::{XlsxReader, XlsxResult};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::options::ReadOptions;

/// Read-only snapshot of one sheet, addressed by row number and heading.
///
/// Row 0 holds the headings; data rows are numbered from 1. Rows may be
/// shorter than the heading row, in which case the missing cells read as
/// empty text.
///
/// # Example
///
/// ```rust
/// use ledger_sheets::TabularReader;
/// use rust_decimal::Decimal;
///
/// let reader = TabularReader::from_rows(vec![
///     vec!["Payee".into(), "Amount".into()],
///     vec!["Acme".into(), "1,000.00".into()],
/// ])
/// .unwrap();
///
/// assert_eq!(reader.cell(1, "Payee").unwrap(), "Acme");
/// assert_eq!(reader.cell_decimal(1, "Amount").unwrap(), Decimal::new(100000, 2));
/// ```
#[derive(Debug, Clone)]
pub struct TabularReader {
    headings: Vec<String>,
    rows: Vec<Vec<String>>,
    options: ReadOptions,
}

impl TabularReader {
    /// Load all rows of `sheet` from the XLSX file at `path`
    pub fn load<P: AsRef<Path>>(path: P, sheet: &str) -> Result<Self> {
        Self::load_with_options(path, sheet, &ReadOptions::default())
    }

    /// Load all rows of `sheet` with explicit coercion options
    pub fn load_with_options<P: AsRef<Path>>(
        path: P,
        sheet: &str,
        options: &ReadOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let rows = read_rows(path, sheet).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!(
            "loaded {} row(s) from sheet '{}' of {}",
            rows.len(),
            sheet,
            path.display()
        );

        Self::from_rows_with_options(rows, options.clone())
    }

    /// Build a reader from rows already in memory
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self> {
        Self::from_rows_with_options(rows, ReadOptions::default())
    }

    /// Build a reader from rows already in memory with explicit options
    pub fn from_rows_with_options(rows: Vec<Vec<String>>, options: ReadOptions) -> Result<Self> {
        let headings = rows.first().cloned().ok_or(Error::EmptyData)?;
        warn_duplicate_headings(&headings);

        Ok(Self {
            headings,
            rows,
            options,
        })
    }

    /// Number of rows, including the heading row
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// The heading row
    pub fn headings(&self) -> &[String] {
        &self.headings
    }

    /// Trimmed text of the cell at `row` under `heading`
    pub fn cell(&self, row: usize, heading: &str) -> Result<String> {
        let column = self.resolve_column(heading)?;
        if row < 1 || row >= self.size() {
            return Err(Error::InvalidRow(row));
        }

        Ok(self.rows[row]
            .get(column)
            .map(|text| text.trim().to_string())
            .unwrap_or_default())
    }

    /// Cell as a decimal amount.
    ///
    /// Thousands separators are removed first; an empty cell is zero.
    pub fn cell_decimal(&self, row: usize, heading: &str) -> Result<Decimal> {
        let text: String = self
            .cell(row, heading)?
            .chars()
            .filter(|&c| c != self.options.thousands_separator)
            .collect();

        if text.is_empty() {
            return Ok(Decimal::ZERO);
        }

        Decimal::from_str(&text).map_err(|source| Error::DecimalParse { text, source })
    }

    /// Cell as a calendar date, trying each configured format in order.
    ///
    /// An empty cell is an error.
    pub fn cell_date(&self, row: usize, heading: &str) -> Result<NaiveDate> {
        let text = self.cell(row, heading)?;

        self.options
            .date_formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(&text, format).ok())
            .ok_or(Error::DateParse { text })
    }

    fn resolve_column(&self, heading: &str) -> Result<usize> {
        if heading.is_empty() {
            return Err(Error::HeadingEmpty);
        }

        self.headings
            .iter()
            .position(|h| h == heading)
            .ok_or_else(|| Error::HeadingNotFound(heading.to_string()))
    }
}

// The reader and its file are dropped before this returns, on every path.
fn read_rows(path: &Path, sheet: &str) -> XlsxResult<Vec<Vec<String>>> {
    let reader = XlsxReader::open(path)?;
    reader.rows(sheet)
}

fn warn_duplicate_headings(headings: &[String]) {
    let mut seen = HashSet::new();
    for heading in headings.iter().filter(|h| !h.is_empty()) {
        if !seen.insert(heading.as_str()) {
            log::warn!(
                "duplicate heading '{}'; lookups use the first occurrence",
                heading
            );
        }
    }
}
