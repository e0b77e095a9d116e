//! Prelude module - common imports for ledger-sheets users
//!
//! ```rust
//! use ledger_sheets::prelude::*;
//! ```

pub use crate::{
    // Support helpers
    cell_name,
    // Writer types
    CellWriter,
    Decimal,
    // Error types
    Error,
    FormatIndex,
    NaiveDate,
    NumberStyle,
    // Options
    ReadOptions,
    Result,
    SheetWriter,
    // Reader types
    TabularReader,
    TabularWriter,
    WriteOptions,
};
