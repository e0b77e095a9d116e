//! # ledger-sheets-core
//!
//! In-memory workbook model used by the ledger-sheets readers and writers.
//!
//! This crate provides:
//! - [`CellValue`] - Text, number and boolean cell values
//! - [`CellAddress`] - A1-style cell addressing
//! - [`Style`] and [`NumberFormat`] - Number-format styling
//! - [`Workbook`], [`Worksheet`] - The document structures
//!
//! ## Example
//!
//! ```rust
//! use ledger_sheets_core::{CellValue, NumberFormat, Style, Workbook};
//!
//! let mut workbook = Workbook::new();
//!
//! workbook.set_cell_value("Sheet1", "A1", "Payee").unwrap();
//! workbook.set_cell_value("Sheet1", "B1", 42.0).unwrap();
//!
//! let money = workbook.new_style(Style::new().with_number_format(NumberFormat::BuiltIn(2)));
//! workbook.set_cell_style("Sheet1", "B1", money).unwrap();
//!
//! let sheet = workbook.worksheet_by_name("Sheet1").unwrap();
//! assert_eq!(sheet.get_value("B1").unwrap(), CellValue::Number(42.0));
//! ```

pub mod cell;
pub mod error;
pub mod style;
pub mod workbook;
pub mod worksheet;

pub use cell::{CellAddress, CellData, CellStorage, CellValue};
pub use error::{Error, Result};
pub use style::{NumberFormat, Style};
pub use workbook::{Workbook, DEFAULT_SHEET_NAME};
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
