//! End-to-end tests for ledger sheets (write -> save -> load -> read typed cells)

use std::path::PathBuf;

use ledger_sheets::prelude::*;
use ledger_sheets::{
    write_cell, write_cell_date, write_cell_decimal, NumberFormat, XlsxError, XlsxReader,
    DEFAULT_SHEET_NAME,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tempfile::TempDir;

fn workspace(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    (dir, path)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Transactions sheet with a header row and one text-only data row
#[test]
fn test_written_ledger_reads_back() {
    let (_dir, path) = workspace("transactions.xlsx");

    let writer = TabularWriter::create(&path, "Transactions").unwrap();
    for (cell, text) in [
        ("A1", "Date"),
        ("B1", "Payee"),
        ("C1", "Type"),
        ("D1", "Amount"),
        ("A2", "2024-01-05"),
        ("B2", "Acme"),
        ("C2", "Payment"),
        ("D2", "1,000.00"),
    ] {
        writer.set_cell(cell, text).unwrap();
    }
    writer.save().unwrap();
    writer.close().unwrap();

    let reader = TabularReader::load(&path, "Transactions").unwrap();
    assert_eq!(reader.size(), 2);
    assert_eq!(reader.headings(), ["Date", "Payee", "Type", "Amount"]);
    assert_eq!(reader.cell(1, "Payee").unwrap(), "Acme");
    assert_eq!(
        reader.cell_decimal(1, "Amount").unwrap(),
        Decimal::new(100000, 2)
    );
    assert_eq!(reader.cell_date(1, "Date").unwrap(), date(2024, 1, 5));
    assert!(matches!(reader.cell(2, "Payee"), Err(Error::InvalidRow(2))));
}

#[test]
fn test_empty_sheet_is_an_error() {
    let (_dir, path) = workspace("empty.xlsx");

    let writer = TabularWriter::create(&path, "Blank").unwrap();
    writer.save().unwrap();
    writer.close().unwrap();

    assert!(matches!(
        TabularReader::load(&path, "Blank"),
        Err(Error::EmptyData)
    ));
}

#[test]
fn test_views_write_to_their_own_sheet() {
    let (_dir, path) = workspace("two_sheets.xlsx");

    let writer = TabularWriter::create(&path, "Income").unwrap();
    let costs = writer.add_sheet("Costs").unwrap();

    writer.set_cell("A1", "Source").unwrap();
    writer.set_cell("A2", "Salary").unwrap();
    costs.set_cell("A1", "Item").unwrap();
    costs.set_cell("A2", "Rent").unwrap();

    writer.save().unwrap();
    writer.close().unwrap();

    let income = TabularReader::load(&path, "Income").unwrap();
    assert_eq!(income.cell(1, "Source").unwrap(), "Salary");

    let costs = TabularReader::load(&path, "Costs").unwrap();
    assert_eq!(costs.cell(1, "Item").unwrap(), "Rent");

    let file = XlsxReader::open(&path).unwrap();
    assert_eq!(file.sheet_names(), vec!["Income", "Costs"]);
}

#[test]
fn test_typed_values_round_trip() {
    let (_dir, path) = workspace("typed.xlsx");

    let writer = TabularWriter::create(&path, DEFAULT_SHEET_NAME).unwrap();
    writer.set_cell("A1", "Date").unwrap();
    writer.set_cell("B1", "Amount").unwrap();
    writer.set_cell("C1", "Count").unwrap();
    writer.set_cell("D1", "Rate").unwrap();
    writer.set_cell_date("A2", date(2023, 12, 31)).unwrap();
    writer
        .set_cell_decimal("B2", Decimal::new(123456, 2), NumberStyle::Money)
        .unwrap();
    writer.set_cell_int("C2", 42).unwrap();
    writer.set_cell_float("D2", 0.075).unwrap();
    writer.set_number_format("D2", NumberStyle::Percent).unwrap();
    writer.save().unwrap();
    writer.close().unwrap();

    let reader = TabularReader::load(&path, DEFAULT_SHEET_NAME).unwrap();
    assert_eq!(reader.cell_date(1, "Date").unwrap(), date(2023, 12, 31));
    assert_eq!(
        reader.cell_decimal(1, "Amount").unwrap(),
        Decimal::new(123456, 2)
    );
    assert_eq!(reader.cell(1, "Count").unwrap(), "42");
    assert_eq!(reader.cell(1, "Rate").unwrap(), "0.075");

    let workbook = XlsxReader::read_file(&path).unwrap();
    let format = |cell: &str| {
        workbook
            .cell_style(DEFAULT_SHEET_NAME, cell)
            .unwrap()
            .number_format
            .clone()
    };
    assert_eq!(format("A2"), NumberFormat::BuiltIn(15));
    assert_eq!(format("B2"), NumberFormat::BuiltIn(2));
    assert_eq!(format("C2"), NumberFormat::BuiltIn(1));
    assert_eq!(format("D2"), NumberFormat::BuiltIn(9));
}

#[test]
fn test_date_serials_read_as_dates() {
    let (_dir, path) = workspace("serials.xlsx");

    let writer = TabularWriter::create(&path, "Ledger").unwrap();
    writer.set_cell("A1", "Date").unwrap();
    writer.set_cell("B1", "Amount").unwrap();
    writer.set_cell_float("A2", 45296.0).unwrap();
    writer.set_number_format("A2", 14).unwrap();
    writer.set_cell_float("B2", 45296.0).unwrap();
    writer.set_number_format("B2", NumberStyle::Money).unwrap();
    writer.save().unwrap();
    writer.close().unwrap();

    let reader = TabularReader::load(&path, "Ledger").unwrap();
    assert_eq!(reader.cell(1, "Date").unwrap(), "2024-01-05");
    assert_eq!(reader.cell_date(1, "Date").unwrap(), date(2024, 1, 5));
    assert_eq!(
        reader.cell_decimal(1, "Amount").unwrap(),
        Decimal::new(45296, 0)
    );
}

#[test]
fn test_text_is_stored_verbatim() {
    let (_dir, path) = workspace("memo.xlsx");

    let writer = TabularWriter::create(&path, "Ledger").unwrap();
    writer.set_cell("A1", "Memo").unwrap();
    writer.set_cell("A2", "ref_x0041_z").unwrap();
    writer.set_cell("A3", "split\rline\u{1}").unwrap();
    writer.save().unwrap();
    writer.close().unwrap();

    let reader = TabularReader::load(&path, "Ledger").unwrap();
    assert_eq!(reader.cell(1, "Memo").unwrap(), "ref_x0041_z");
    assert_eq!(reader.cell(2, "Memo").unwrap(), "split\rline\u{1}");
}

#[test]
fn test_format_index_range() {
    let writer = TabularWriter::create("unused.xlsx", "Ledger").unwrap();

    assert!(matches!(
        writer.set_number_format("A1", 50),
        Err(Error::InvalidFormatIndex(50))
    ));
    assert!(matches!(
        writer.set_number_format("A1", -1),
        Err(Error::InvalidFormatIndex(-1))
    ));

    writer.set_number_format("A1", 2).unwrap();
    assert_eq!(writer.number_format("A1").unwrap(), NumberFormat::BuiltIn(2));
}

#[test]
fn test_closed_writer_rejects_everything() {
    let (_dir, path) = workspace("closed.xlsx");

    let writer = TabularWriter::create(&path, "Ledger").unwrap();
    let view = writer.add_sheet("Other").unwrap();
    writer.close().unwrap();

    assert!(matches!(writer.save(), Err(Error::NilWriter)));
    assert!(matches!(writer.close(), Err(Error::NilWriter)));
    assert!(matches!(writer.set_cell("A1", "x"), Err(Error::NilWriter)));
    assert!(matches!(
        view.set_cell_date("A1", date(2024, 1, 1)),
        Err(Error::NilWriter)
    ));
    assert!(matches!(
        view.set_number_format("A1", NumberStyle::Money),
        Err(Error::NilWriter)
    ));
    // Nothing was saved
    assert!(!path.exists());
}

#[test]
fn test_missing_file_and_sheet() {
    let (_dir, path) = workspace("ledger.xlsx");

    let err = TabularReader::load(&path, "Transactions").unwrap_err();
    assert!(matches!(
        &err,
        Error::Io { path: p, source: XlsxError::Io(_) } if *p == path
    ));

    let writer = TabularWriter::create(&path, "Transactions").unwrap();
    writer.set_cell("A1", "Payee").unwrap();
    writer.save().unwrap();
    writer.close().unwrap();

    assert!(matches!(
        TabularReader::load(&path, "Budget"),
        Err(Error::Io { source: XlsxError::SheetNotFound(name), .. }) if name == "Budget"
    ));
}

#[test]
fn test_support_helpers() {
    let (_dir, path) = workspace("helpers.xlsx");

    let writer = TabularWriter::create(&path, "Ledger").unwrap();
    for (column, heading) in [("A", "Date"), ("B", "Payee"), ("C", "Amount")] {
        write_cell(&writer, column, 1, heading).unwrap();
    }
    for (i, (payee, cents)) in [("Acme", 995_i64), ("Globex", 120_000)].iter().enumerate() {
        let row = i as u32 + 2;
        write_cell_date(&writer, "A", row, date(2024, 2, 1 + i as u32)).unwrap();
        write_cell(&writer, "B", row, payee).unwrap();
        write_cell_decimal(&writer, "C", row, Decimal::new(*cents, 2)).unwrap();
    }
    writer.save().unwrap();
    writer.close().unwrap();

    let reader = TabularReader::load(&path, "Ledger").unwrap();
    assert_eq!(reader.size(), 3);
    assert_eq!(reader.cell(2, "Payee").unwrap(), "Globex");
    assert_eq!(reader.cell_date(2, "Date").unwrap(), date(2024, 2, 2));
    assert_eq!(
        reader.cell_decimal(1, "Amount").unwrap(),
        Decimal::new(995, 2)
    );
    assert_eq!(cell_name("C", 3), "C3");
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

proptest! {
    #[test]
    fn prop_thousands_separator_is_ignored(units in 0u64..1_000_000_000_000, cents in 0u32..100) {
        let plain = format!("{}.{:02}", units, cents);
        let grouped = format!("{}.{:02}", group_thousands(&units.to_string()), cents);

        let reader = TabularReader::from_rows(vec![
            vec!["Plain".to_string(), "Grouped".to_string()],
            vec![plain.clone(), grouped],
        ])
        .unwrap();

        let expected: Decimal = plain.parse().unwrap();
        prop_assert_eq!(reader.cell_decimal(1, "Plain").unwrap(), expected);
        prop_assert_eq!(reader.cell_decimal(1, "Grouped").unwrap(), expected);
    }
}
