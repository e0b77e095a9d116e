//! # ledger-sheets-xlsx
//!
//! XLSX (Office Open XML) reader and writer for ledger-sheets.
//!
//! Only what a ledger needs is covered: sheets, text/number/boolean cells and
//! number-format styles.

pub mod error;
pub mod reader;
pub mod writer;

mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
