//! Workbook type - the main document structure

use crate::cell::{CellAddress, CellValue};
use crate::error::{Error, Result};
use crate::style::Style;
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// Name of the worksheet created by [`Workbook::new`]
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// A workbook (spreadsheet document)
///
/// A workbook owns its worksheets and a list of styles. Style id 0 is always
/// the default style; every call to [`Workbook::new_style`] appends a new
/// entry, even when an identical style already exists.
#[derive(Debug, Clone)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
    styles: Vec<Style>,
}

impl Workbook {
    /// Create a new workbook with one worksheet named "Sheet1"
    pub fn new() -> Self {
        let mut wb = Self::empty();
        wb.worksheets.push(Worksheet::new(DEFAULT_SHEET_NAME));
        wb
    }

    /// Create an empty workbook with no worksheets
    pub fn empty() -> Self {
        Self {
            worksheets: Vec::new(),
            styles: vec![Style::default()],
        }
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Get a mutable worksheet by name
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.worksheets.iter_mut().find(|ws| ws.name() == name)
    }

    /// Get the index of a worksheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.worksheets.iter().position(|ws| ws.name() == name)
    }

    /// Worksheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.worksheets.iter().map(|ws| ws.name()).collect()
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Add a new worksheet with specified name
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        self.validate_sheet_name(name)?;

        let index = self.worksheets.len();
        self.worksheets.push(Worksheet::new(name));

        Ok(index)
    }

    /// Add an existing worksheet to the workbook
    pub fn add_existing_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name())?;
        let index = self.worksheets.len();
        self.worksheets.push(worksheet);
        Ok(index)
    }

    /// Remove a worksheet by name
    pub fn remove_worksheet_by_name(&mut self, name: &str) -> Result<Worksheet> {
        let index = self
            .sheet_index(name)
            .ok_or_else(|| Error::SheetNotFound(name.into()))?;
        Ok(self.worksheets.remove(index))
    }

    // === Styles ===

    /// Register a style and return its id
    pub fn new_style(&mut self, style: Style) -> u32 {
        self.styles.push(style);
        (self.styles.len() - 1) as u32
    }

    /// Get a style by id
    pub fn style(&self, id: u32) -> Option<&Style> {
        self.styles.get(id as usize)
    }

    /// All registered styles, indexed by id
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    // === Cell shortcuts ===

    /// Set a cell value on the named sheet
    pub fn set_cell_value<V: Into<CellValue>>(
        &mut self,
        sheet: &str,
        address: &str,
        value: V,
    ) -> Result<()> {
        self.sheet_mut(sheet)?.set_cell_value(address, value)
    }

    /// Apply a registered style to a cell on the named sheet
    pub fn set_cell_style(&mut self, sheet: &str, address: &str, style_id: u32) -> Result<()> {
        if self.style(style_id).is_none() {
            return Err(Error::InvalidStyleIndex(style_id));
        }
        let addr = CellAddress::parse(address)?;
        self.sheet_mut(sheet)?
            .set_cell_style_at(addr.row, addr.col, style_id)
    }

    /// Get the style applied to a cell on the named sheet
    pub fn cell_style(&self, sheet: &str, address: &str) -> Result<&Style> {
        let ws = self
            .worksheet_by_name(sheet)
            .ok_or_else(|| Error::SheetNotFound(sheet.into()))?;
        let id = ws.cell_style_id(address)?;
        self.style(id).ok_or(Error::InvalidStyleIndex(id))
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.worksheet_by_name_mut(name)
            .ok_or_else(|| Error::SheetNotFound(name.into()))
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }

        // Case-insensitive
        let name_lower = name.to_lowercase();
        if self
            .worksheets
            .iter()
            .any(|ws| ws.name().to_lowercase() == name_lower)
        {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}
