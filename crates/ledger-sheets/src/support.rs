//! Column-and-row shortcuts over [`CellWriter`]
//!
//! Each helper composes an A1 reference with [`cell_name`] and reports a
//! failure as [`Error::CellWrite`] carrying that reference.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::writer::{CellWriter, NumberStyle};

/// Compose an A1 reference from column letters and a 1-based row
pub fn cell_name(column: &str, row: u32) -> String {
    format!("{}{}", column, row)
}

/// Write text to the cell at `column` and `row`
pub fn write_cell<W: CellWriter>(writer: &W, column: &str, row: u32, value: &str) -> Result<()> {
    let cell = cell_name(column, row);
    with_cell(writer.set_cell(&cell, value), cell)
}

/// Write an integer with the Integer format
pub fn write_cell_int<W: CellWriter>(writer: &W, column: &str, row: u32, value: i64) -> Result<()> {
    let cell = cell_name(column, row);
    with_cell(writer.set_cell_int(&cell, value), cell)
}

pub fn write_cell_float<W: CellWriter>(
    writer: &W,
    column: &str,
    row: u32,
    value: f64,
) -> Result<()> {
    let cell = cell_name(column, row);
    with_cell(writer.set_cell_float(&cell, value), cell)
}

/// Write a decimal amount with the Money format
pub fn write_cell_decimal<W: CellWriter>(
    writer: &W,
    column: &str,
    row: u32,
    value: Decimal,
) -> Result<()> {
    let cell = cell_name(column, row);
    with_cell(writer.set_cell_decimal(&cell, value, NumberStyle::Money), cell)
}

pub fn write_cell_date<W: CellWriter>(
    writer: &W,
    column: &str,
    row: u32,
    value: NaiveDate,
) -> Result<()> {
    let cell = cell_name(column, row);
    with_cell(writer.set_cell_date(&cell, value), cell)
}

fn with_cell(result: Result<()>, cell: String) -> Result<()> {
    result.map_err(|source| Error::CellWrite {
        cell,
        source: Box::new(source),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::TabularWriter;
    use ledger_sheets_core::{CellValue, NumberFormat};

    #[test]
    fn test_cell_name() {
        assert_eq!(cell_name("A", 1), "A1");
        assert_eq!(cell_name("AB", 120), "AB120");
    }

    #[test]
    fn test_helpers_write_through_writer() {
        let w = TabularWriter::create("ledger.xlsx", "Ledger").unwrap();

        write_cell(&w, "A", 1, "Payee").unwrap();
        write_cell_int(&w, "B", 1, 7).unwrap();
        write_cell_float(&w, "C", 1, 0.5).unwrap();
        write_cell_decimal(&w, "D", 1, Decimal::new(1050, 2)).unwrap();
        write_cell_date(&w, "E", 1, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).unwrap();

        assert_eq!(w.cell_value("A1").unwrap(), CellValue::from("Payee"));
        assert_eq!(w.cell_value("B1").unwrap(), CellValue::Number(7.0));
        assert_eq!(w.cell_value("C1").unwrap(), CellValue::Number(0.5));
        assert_eq!(w.cell_value("D1").unwrap(), CellValue::from("10.50"));
        assert_eq!(w.number_format("D1").unwrap(), NumberFormat::BuiltIn(2));
        assert_eq!(w.cell_value("E1").unwrap(), CellValue::from("2024-03-01"));
    }

    #[test]
    fn test_failure_carries_reference() {
        let w = TabularWriter::create("ledger.xlsx", "Ledger").unwrap();
        let view = w.add_sheet("Other").unwrap();
        w.close().unwrap();

        let err = write_cell(&view, "C", 4, "x").unwrap_err();
        assert!(matches!(
            &err,
            Error::CellWrite { cell, source } if cell == "C4" && matches!(**source, Error::NilWriter)
        ));
        assert_eq!(
            err.to_string(),
            "error writing cell C4: spreadsheet writer is closed"
        );
    }

    #[test]
    fn test_empty_column_is_bad_reference() {
        let w = TabularWriter::create("ledger.xlsx", "Ledger").unwrap();
        let err = write_cell_int(&w, "", 3, 1).unwrap_err();
        assert!(matches!(
            err,
            Error::CellWrite { source, .. } if matches!(*source, Error::Workbook(_))
        ));
    }
}
