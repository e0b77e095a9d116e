//! # ledger-sheets
//!
//! Header-indexed, typed access to ledger spreadsheets stored as XLSX.
//!
//! - [`TabularReader`] loads one sheet and reads cells by data row and
//!   heading, as trimmed text, [`Decimal`] amounts or [`NaiveDate`] dates.
//! - [`TabularWriter`] builds a workbook, applies built-in number formats
//!   and saves it. Extra sheets are written through [`SheetWriter`] views.
//!
//! ## Example
//!
//! ```rust
//! use ledger_sheets::prelude::*;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("ledger.xlsx");
//!
//! let writer = TabularWriter::create(&path, "Transactions").unwrap();
//! writer.set_cell("A1", "Payee").unwrap();
//! writer.set_cell("B1", "Amount").unwrap();
//! writer.set_cell("A2", "Acme").unwrap();
//! writer
//!     .set_cell_decimal("B2", Decimal::new(125050, 2), NumberStyle::Money)
//!     .unwrap();
//! writer.save().unwrap();
//! writer.close().unwrap();
//!
//! let reader = TabularReader::load(&path, "Transactions").unwrap();
//! assert_eq!(reader.size(), 2);
//! assert_eq!(reader.cell(1, "Payee").unwrap(), "Acme");
//! assert_eq!(reader.cell_decimal(1, "Amount").unwrap(), Decimal::new(125050, 2));
//! ```

pub mod error;
pub mod options;
pub mod prelude;
pub mod reader;
pub mod support;
pub mod writer;

pub use error::{Error, Result};
pub use options::{ReadOptions, WriteOptions};
pub use reader::TabularReader;
pub use support::{
    cell_name, write_cell, write_cell_date, write_cell_decimal, write_cell_float, write_cell_int,
};
pub use writer::{CellWriter, FormatIndex, NumberStyle, SheetHandle, SheetWriter, TabularWriter};

// Re-export the workbook model and file layer
pub use ledger_sheets_core::{
    CellAddress, CellValue, Error as WorkbookError, NumberFormat, Style, Workbook, Worksheet,
    DEFAULT_SHEET_NAME,
};
pub use ledger_sheets_xlsx::{XlsxError, XlsxReader, XlsxWriter};

// Value types used in the typed accessors
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
