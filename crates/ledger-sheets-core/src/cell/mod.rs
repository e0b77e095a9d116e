//! Cell-related types
//!
//! - [`CellValue`] - The value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellData`] - Value plus style id
//! - [`CellStorage`] - Sparse row-major storage for a worksheet

mod address;
mod storage;
mod value;

pub use address::CellAddress;
pub use storage::{CellData, CellStorage};
pub use value::CellValue;
