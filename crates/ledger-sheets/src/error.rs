//! Error types for ledger-sheets

use std::path::PathBuf;

use ledger_sheets_xlsx::XlsxError;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the tabular reader and writer
#[derive(Debug, Error)]
pub enum Error {
    /// The spreadsheet file could not be opened, read or saved
    #[error("spreadsheet file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },

    /// The sheet contains no rows, so there is no header
    #[error("spreadsheet is empty")]
    EmptyData,

    /// A required string argument was empty; names the argument
    #[error("{0} must not be an empty string")]
    InvalidArgument(&'static str),

    #[error("heading must not be empty")]
    HeadingEmpty,

    #[error("heading not found in headings: {0}")]
    HeadingNotFound(String),

    /// Data rows start at 1; the header row and rows past the end are invalid
    #[error("invalid row for spreadsheet: {0}")]
    InvalidRow(usize),

    #[error("invalid decimal '{text}': {source}")]
    DecimalParse {
        text: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("invalid date '{text}'")]
    DateParse { text: String },

    /// Format index outside 0..=49
    #[error("invalid value for format index: {0}")]
    InvalidFormatIndex(i32),

    /// The writer's workbook has been closed
    #[error("spreadsheet writer is closed")]
    NilWriter,

    /// Error from the in-memory workbook (bad cell reference, sheet name, ...)
    #[error(transparent)]
    Workbook(#[from] ledger_sheets_core::Error),

    /// A support helper failed to write one cell
    #[error("error writing cell {cell}: {source}")]
    CellWrite {
        cell: String,
        #[source]
        source: Box<Error>,
    },
}
