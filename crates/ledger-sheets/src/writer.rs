//! Writing cells with number formats
//!
//! A [`TabularWriter`] owns the workbook being built. [`SheetWriter`] views
//! returned by `add_sheet` share that workbook and write to their own sheet,
//! but only the owner can [`save`](TabularWriter::save) or
//! [`close`](TabularWriter::close) it.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::NaiveDate;
use ledger_sheets_core::{CellValue, NumberFormat, Style, Workbook, DEFAULT_SHEET_NAME};
use ledger_sheets_xlsx::XlsxWriter;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::options::WriteOptions;

/// Named built-in number formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberStyle {
    /// `0`
    Integer,
    /// `0.00`
    Money,
    /// `0%`
    Percent,
    /// `d-mmm-yy`
    Date,
}

impl NumberStyle {
    /// Built-in number format code
    pub const fn code(self) -> i32 {
        let id = match self {
            NumberStyle::Integer => NumberFormat::ID_NUMBER_INT,
            NumberStyle::Money => NumberFormat::ID_NUMBER_DEC2,
            NumberStyle::Percent => NumberFormat::ID_PERCENT_INT,
            NumberStyle::Date => NumberFormat::ID_DATE_MEDIUM,
        };
        id as i32
    }
}

/// Raw built-in number format index, checked when applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatIndex(pub i32);

impl FormatIndex {
    /// Highest built-in format index
    pub const MAX: i32 = NumberFormat::MAX_BUILTIN_ID as i32;

    /// The built-in format id, if the index is in `0..=49`
    pub fn validate(self) -> Result<u32> {
        if (0..=Self::MAX).contains(&self.0) {
            Ok(self.0 as u32)
        } else {
            Err(Error::InvalidFormatIndex(self.0))
        }
    }
}

impl From<i32> for FormatIndex {
    fn from(index: i32) -> Self {
        FormatIndex(index)
    }
}

impl From<NumberStyle> for FormatIndex {
    fn from(style: NumberStyle) -> Self {
        FormatIndex(style.code())
    }
}

/// Shared workbook plus the sheet a writer targets.
///
/// The workbook slot is emptied by [`TabularWriter::close`].
#[derive(Debug, Clone)]
pub struct SheetHandle {
    workbook: Rc<RefCell<Option<Workbook>>>,
    sheet: String,
    options: Rc<WriteOptions>,
}

impl SheetHandle {
    fn new(workbook: Workbook, sheet: &str, options: WriteOptions) -> Self {
        Self {
            workbook: Rc::new(RefCell::new(Some(workbook))),
            sheet: sheet.to_string(),
            options: Rc::new(options),
        }
    }

    /// Name of the targeted sheet
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    fn with_workbook<T>(&self, f: impl FnOnce(&mut Workbook, &str) -> Result<T>) -> Result<T> {
        let mut slot = self.workbook.borrow_mut();
        let workbook = slot.as_mut().ok_or(Error::NilWriter)?;
        f(workbook, &self.sheet)
    }

    fn set_value(&self, cell: &str, value: CellValue) -> Result<()> {
        require_cell(cell)?;
        self.with_workbook(|workbook, sheet| Ok(workbook.set_cell_value(sheet, cell, value)?))
    }

    fn add_sheet(&self, name: &str) -> Result<SheetWriter> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("sheet name"));
        }
        self.with_workbook(|workbook, _| Ok(workbook.add_worksheet_with_name(name)?))?;

        Ok(SheetWriter {
            handle: SheetHandle {
                workbook: Rc::clone(&self.workbook),
                sheet: name.to_string(),
                options: Rc::clone(&self.options),
            },
        })
    }
}

/// Cell setters shared by [`TabularWriter`] and its [`SheetWriter`] views
pub trait CellWriter {
    /// The shared workbook and target sheet
    fn handle(&self) -> &SheetHandle;

    /// Name of the sheet this writer targets
    fn sheet_name(&self) -> &str {
        self.handle().sheet()
    }

    /// Store text
    fn set_cell(&self, cell: &str, value: &str) -> Result<()> {
        self.handle().set_value(cell, CellValue::from(value))
    }

    /// Store an integer and apply the Integer format
    fn set_cell_int(&self, cell: &str, value: i64) -> Result<()> {
        self.handle().set_value(cell, CellValue::from(value))?;
        self.set_number_format(cell, NumberStyle::Integer)
    }

    /// Store a floating-point number
    fn set_cell_float(&self, cell: &str, value: f64) -> Result<()> {
        self.handle().set_value(cell, CellValue::from(value))
    }

    /// Apply `format`, then store the decimal's exact text
    fn set_cell_decimal(
        &self,
        cell: &str,
        value: Decimal,
        format: impl Into<FormatIndex>,
    ) -> Result<()> {
        require_cell(cell)?;
        self.set_number_format(cell, format)?;
        self.handle().set_value(cell, CellValue::String(value.to_string()))
    }

    /// Apply the Date format, then store the date's text
    fn set_cell_date(&self, cell: &str, value: NaiveDate) -> Result<()> {
        require_cell(cell)?;
        self.set_number_format(cell, NumberStyle::Date)?;
        let text = value
            .format(&self.handle().options.date_format)
            .to_string();
        self.handle().set_value(cell, CellValue::String(text))
    }

    /// Register a new style with the built-in format `index` and apply it to `cell`
    fn set_number_format(&self, cell: &str, index: impl Into<FormatIndex>) -> Result<()> {
        let id = index.into().validate()?;
        require_cell(cell)?;
        self.handle().with_workbook(|workbook, sheet| {
            let style = workbook.new_style(Style::new().with_number_format(NumberFormat::from_id(id)));
            Ok(workbook.set_cell_style(sheet, cell, style)?)
        })
    }

    /// Current value of `cell`
    fn cell_value(&self, cell: &str) -> Result<CellValue> {
        require_cell(cell)?;
        self.handle().with_workbook(|workbook, sheet| {
            let worksheet = workbook
                .worksheet_by_name(sheet)
                .ok_or_else(|| ledger_sheets_core::Error::SheetNotFound(sheet.to_string()))?;
            Ok(worksheet.get_value(cell)?)
        })
    }

    /// Number format applied to `cell`
    fn number_format(&self, cell: &str) -> Result<NumberFormat> {
        require_cell(cell)?;
        self.handle().with_workbook(|workbook, sheet| {
            Ok(workbook.cell_style(sheet, cell)?.number_format.clone())
        })
    }
}

fn require_cell(cell: &str) -> Result<()> {
    if cell.is_empty() {
        return Err(Error::InvalidArgument("cell reference"));
    }
    Ok(())
}

/// Owner of a workbook being written to an XLSX file
#[derive(Debug)]
pub struct TabularWriter {
    path: PathBuf,
    handle: SheetHandle,
}

impl TabularWriter {
    /// Start a workbook for `path` whose only sheet is `sheet`
    pub fn create<P: AsRef<Path>>(path: P, sheet: &str) -> Result<Self> {
        Self::create_with_options(path, sheet, WriteOptions::default())
    }

    /// As [`create`](Self::create) with explicit write options
    pub fn create_with_options<P: AsRef<Path>>(
        path: P,
        sheet: &str,
        options: WriteOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("spreadsheet filename"));
        }
        if sheet.is_empty() {
            return Err(Error::InvalidArgument("sheet name"));
        }

        // Replace the placeholder sheet unless it is the one requested
        let mut workbook = Workbook::new();
        if sheet != DEFAULT_SHEET_NAME {
            workbook.remove_worksheet_by_name(DEFAULT_SHEET_NAME)?;
            workbook.add_worksheet_with_name(sheet)?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            handle: SheetHandle::new(workbook, sheet, options),
        })
    }

    /// Path the workbook is saved to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a sheet to the shared workbook and return a view writing to it
    pub fn add_sheet(&self, name: &str) -> Result<SheetWriter> {
        self.handle.add_sheet(name)
    }

    /// Write the workbook to [`path`](Self::path)
    pub fn save(&self) -> Result<()> {
        let slot = self.handle.workbook.borrow();
        let workbook = slot.as_ref().ok_or(Error::NilWriter)?;

        XlsxWriter::write_file(workbook, &self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;

        log::debug!(
            "saved {} sheet(s) to {}",
            workbook.sheet_count(),
            self.path.display()
        );
        Ok(())
    }

    /// Release the workbook. Unsaved changes are discarded.
    ///
    /// Afterwards every operation on this writer and its views fails with
    /// [`Error::NilWriter`].
    pub fn close(&self) -> Result<()> {
        self.handle
            .workbook
            .borrow_mut()
            .take()
            .map(|_| ())
            .ok_or(Error::NilWriter)
    }
}

impl CellWriter for TabularWriter {
    fn handle(&self) -> &SheetHandle {
        &self.handle
    }
}

/// A view writing to one sheet of a [`TabularWriter`]'s workbook
#[derive(Debug, Clone)]
pub struct SheetWriter {
    handle: SheetHandle,
}

impl SheetWriter {
    /// Add another sheet to the shared workbook
    pub fn add_sheet(&self, name: &str) -> Result<SheetWriter> {
        self.handle.add_sheet(name)
    }
}

impl CellWriter for SheetWriter {
    fn handle(&self) -> &SheetHandle {
        &self.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> TabularWriter {
        TabularWriter::create("ledger.xlsx", "Ledger").unwrap()
    }

    #[test]
    fn test_number_style_codes() {
        assert_eq!(NumberStyle::Integer.code(), 1);
        assert_eq!(NumberStyle::Money.code(), 2);
        assert_eq!(NumberStyle::Percent.code(), 9);
        assert_eq!(NumberStyle::Date.code(), 15);
    }

    #[test]
    fn test_format_index_bounds() {
        assert_eq!(FormatIndex(0).validate().unwrap(), 0);
        assert_eq!(FormatIndex(49).validate().unwrap(), 49);
        assert!(matches!(
            FormatIndex(50).validate(),
            Err(Error::InvalidFormatIndex(50))
        ));
        assert!(matches!(
            FormatIndex(-1).validate(),
            Err(Error::InvalidFormatIndex(-1))
        ));
    }

    #[test]
    fn test_create_arguments() {
        assert!(matches!(
            TabularWriter::create("", ""),
            Err(Error::InvalidArgument("spreadsheet filename"))
        ));
        assert!(matches!(
            TabularWriter::create("out.xlsx", ""),
            Err(Error::InvalidArgument("sheet name"))
        ));
    }

    #[test]
    fn test_create_replaces_placeholder() {
        let w = writer();
        let names = w
            .handle
            .with_workbook(|wb, _| Ok(wb.sheet_names().join(",")))
            .unwrap();
        assert_eq!(names, "Ledger");

        let w = TabularWriter::create("out.xlsx", DEFAULT_SHEET_NAME).unwrap();
        let names = w
            .handle
            .with_workbook(|wb, _| Ok(wb.sheet_names().join(",")))
            .unwrap();
        assert_eq!(names, DEFAULT_SHEET_NAME);
    }

    #[test]
    fn test_empty_cell_rejected() {
        let w = writer();
        for result in [
            w.set_cell("", "x"),
            w.set_cell_int("", 1),
            w.set_cell_float("", 1.0),
            w.set_cell_decimal("", Decimal::ONE, NumberStyle::Money),
            w.set_cell_date("", NaiveDate::MIN),
        ] {
            assert!(matches!(result, Err(Error::InvalidArgument("cell reference"))));
        }
    }

    #[test]
    fn test_int_gets_integer_format() {
        let w = writer();
        w.set_cell_int("B2", 42).unwrap();
        assert_eq!(w.cell_value("B2").unwrap(), CellValue::Number(42.0));
        assert_eq!(w.number_format("B2").unwrap(), NumberFormat::BuiltIn(1));
    }

    #[test]
    fn test_decimal_is_stored_as_text() {
        let w = writer();
        w.set_cell_decimal("C3", Decimal::new(123456, 2), NumberStyle::Money)
            .unwrap();
        assert_eq!(w.cell_value("C3").unwrap(), CellValue::from("1234.56"));
        assert_eq!(w.number_format("C3").unwrap(), NumberFormat::BuiltIn(2));
    }

    #[test]
    fn test_bad_format_prevents_decimal_write() {
        let w = writer();
        assert!(matches!(
            w.set_cell_decimal("A1", Decimal::ONE, 50),
            Err(Error::InvalidFormatIndex(50))
        ));
        assert_eq!(w.cell_value("A1").unwrap(), CellValue::Empty);
    }

    #[test]
    fn test_date_uses_configured_format() {
        let options = WriteOptions {
            date_format: "%d/%m/%Y".to_string(),
        };
        let w = TabularWriter::create_with_options("out.xlsx", "Ledger", options).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();

        w.set_cell_date("A1", date).unwrap();
        assert_eq!(w.cell_value("A1").unwrap(), CellValue::from("05/01/2024"));
        assert_eq!(w.number_format("A1").unwrap(), NumberFormat::BuiltIn(15));

        let view = w.add_sheet("More").unwrap();
        view.set_cell_date("A1", date).unwrap();
        assert_eq!(view.cell_value("A1").unwrap(), CellValue::from("05/01/2024"));
    }

    #[test]
    fn test_each_format_call_registers_a_style() {
        let w = writer();
        w.set_number_format("A1", 2).unwrap();
        w.set_number_format("A2", 2).unwrap();
        let count = w.handle.with_workbook(|wb, _| Ok(wb.styles().len())).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_invalid_reference_is_workbook_error() {
        let w = writer();
        assert!(matches!(w.set_cell("1A", "x"), Err(Error::Workbook(_))));
    }

    #[test]
    fn test_add_sheet() {
        let w = writer();
        assert!(matches!(
            w.add_sheet(""),
            Err(Error::InvalidArgument("sheet name"))
        ));

        let view = w.add_sheet("Next").unwrap();
        assert_eq!(view.sheet_name(), "Next");
        assert_eq!(w.sheet_name(), "Ledger");

        let third = view.add_sheet("Third").unwrap();
        third.set_cell("A1", "x").unwrap();
        assert!(matches!(w.add_sheet("next"), Err(Error::Workbook(_))));
    }

    #[test]
    fn test_close_releases_handle() {
        let w = writer();
        let view = w.add_sheet("Next").unwrap();

        w.close().unwrap();

        assert!(matches!(w.close(), Err(Error::NilWriter)));
        assert!(matches!(w.save(), Err(Error::NilWriter)));
        assert!(matches!(w.set_cell("A1", "x"), Err(Error::NilWriter)));
        assert!(matches!(view.set_cell_int("A1", 1), Err(Error::NilWriter)));
        assert!(matches!(view.add_sheet("Later"), Err(Error::NilWriter)));
    }
}
