//! Worksheet type

use crate::cell::{CellAddress, CellData, CellStorage, CellValue};
use crate::error::{Error, Result};
use crate::style::Style;
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
///
/// Cell styles are stored as ids into the owning [`Workbook`](crate::Workbook)'s
/// style list; the worksheet does not validate them on its own.
#[derive(Debug, Clone)]
pub struct Worksheet {
    name: String,
    cells: CellStorage,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    // === Cell Access ===

    /// Get a cell by address string (e.g., "A1")
    pub fn cell(&self, address: &str) -> Result<Option<&CellData>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.get(addr.row, addr.col))
    }

    /// Get a cell by row and column indices
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(row, col)
    }

    /// Get cell value (convenience method)
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get cell value by indices
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cells
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Get a cell's style id by address string.
    ///
    /// Returns 0 if the cell does not exist or has the default style.
    pub fn cell_style_id(&self, address: &str) -> Result<u32> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cell_style_id_at(addr.row, addr.col))
    }

    /// Get a cell's style id by row/column.
    pub fn cell_style_id_at(&self, row: u32, col: u16) -> u32 {
        self.cells.get(row, col).map(|c| c.style_id).unwrap_or(0)
    }

    // === Cell Modification ===

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by row and column indices
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        validate_cell_position(row, col)?;
        self.cells.set_value(row, col, value.into());
        Ok(())
    }

    /// Set a cell's style id by row and column indices
    pub fn set_cell_style_at(&mut self, row: u32, col: u16, style_id: u32) -> Result<()> {
        validate_cell_position(row, col)?;
        self.cells.set_style(row, col, style_id);
        Ok(())
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Check if the worksheet is empty
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all stored cells in row order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    /// Render the sheet as a dense grid of text, ignoring number formats.
    ///
    /// See [`Worksheet::rows_with_styles`].
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows_with_styles(&[])
    }

    /// Render the sheet as a dense grid of text.
    ///
    /// The grid ends at the last row holding a value and each row ends at its
    /// last value; gaps before that are filled with empty strings. Cells that
    /// only carry a style do not extend the grid.
    ///
    /// Each cell is rendered through the number format of its style in
    /// `styles` (see [`NumberFormat::render`](crate::NumberFormat::render)),
    /// so date serials come out as dates. Unknown style ids render plainly.
    pub fn rows_with_styles(&self, styles: &[Style]) -> Vec<Vec<String>> {
        let last_row = self
            .cells
            .row_indices()
            .filter(|&r| self.last_value_col(r).is_some())
            .last();

        let Some(last_row) = last_row else {
            return Vec::new();
        };

        (0..=last_row)
            .map(|row| match self.last_value_col(row) {
                Some(last_col) => (0..=last_col)
                    .map(|col| render_cell(self.cells.get(row, col), styles))
                    .collect(),
                None => Vec::new(),
            })
            .collect()
    }

    fn last_value_col(&self, row: u32) -> Option<u16> {
        self.cells
            .iter_row(row)
            .filter(|(_, data)| !data.value.is_empty())
            .map(|(col, _)| col)
            .last()
    }
}

fn render_cell(cell: Option<&CellData>, styles: &[Style]) -> String {
    let Some(cell) = cell else {
        return String::new();
    };
    match styles.get(cell.style_id as usize) {
        Some(style) => style.number_format.render(&cell.value),
        None => cell.value.to_text(),
    }
}

fn validate_cell_position(row: u32, col: u16) -> Result<()> {
    if row >= MAX_ROWS {
        return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
    }
    if col >= MAX_COLS {
        return Err(Error::ColumnOutOfBounds(col as u32, MAX_COLS - 1));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_worksheet() {
        let ws = Worksheet::new("Ledger");
        assert_eq!(ws.name(), "Ledger");
        assert!(ws.is_empty());
        assert!(ws.rows().is_empty());
    }

    #[test]
    fn test_set_cell_values() {
        let mut ws = Worksheet::new("Test");

        ws.set_cell_value("A1", "Hello").unwrap();
        ws.set_cell_value("B1", 42.0).unwrap();
        ws.set_cell_value("C1", true).unwrap();

        assert_eq!(ws.get_value("A1").unwrap(), CellValue::from("Hello"));
        assert_eq!(ws.get_value("B1").unwrap(), CellValue::Number(42.0));
        assert_eq!(ws.get_value("C1").unwrap(), CellValue::Boolean(true));
        assert_eq!(ws.get_value("D1").unwrap(), CellValue::Empty);
        assert!(ws.get_value("1D").is_err());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ws = Worksheet::new("Test");
        assert!(ws.set_cell_value_at(MAX_ROWS, 0, 1.0).is_err());
        assert!(ws.set_cell_value_at(0, MAX_COLS, 1.0).is_err());
        assert!(ws.set_cell_style_at(MAX_ROWS, 0, 1).is_err());
    }

    #[test]
    fn test_rows_fill_gaps() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("A1", "Date").unwrap();
        ws.set_cell_value("C1", "Amount").unwrap();
        ws.set_cell_value("B3", 1000.0).unwrap();

        assert_eq!(
            ws.rows(),
            vec![
                vec!["Date".to_string(), String::new(), "Amount".to_string()],
                vec![],
                vec![String::new(), "1000".to_string()],
            ]
        );
    }

    #[test]
    fn test_rows_ignore_style_only_cells() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("A1", "x").unwrap();
        ws.set_cell_style_at(0, 4, 1).unwrap();
        ws.set_cell_style_at(5, 0, 1).unwrap();

        assert_eq!(ws.rows(), vec![vec!["x".to_string()]]);
        assert_eq!(ws.cell_style_id("E1").unwrap(), 1);
        assert_eq!(ws.cell_count(), 3);
    }

    #[test]
    fn test_rows_render_date_serials() {
        use crate::style::NumberFormat;

        let styles = vec![
            Style::default(),
            Style::new().with_number_format(NumberFormat::BuiltIn(14)),
            Style::new().with_number_format(NumberFormat::BuiltIn(2)),
        ];
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("A1", 45296.0).unwrap();
        ws.set_cell_style_at(0, 0, 1).unwrap();
        ws.set_cell_value("B1", 45296.0).unwrap();
        ws.set_cell_style_at(0, 1, 2).unwrap();
        ws.set_cell_value("C1", 45296.0).unwrap();
        ws.set_cell_style_at(0, 2, 9).unwrap();

        assert_eq!(
            ws.rows_with_styles(&styles),
            vec![vec![
                "2024-01-05".to_string(),
                "45296".to_string(),
                "45296".to_string()
            ]]
        );
        assert_eq!(ws.rows()[0][0], "45296");
    }
}
