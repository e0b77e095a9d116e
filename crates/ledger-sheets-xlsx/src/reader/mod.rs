//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::read_styles_xml;
use ledger_sheets_core::{CellAddress, CellValue, Style, Workbook, Worksheet};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];

        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// XLSX file reader
///
/// The whole workbook is loaded when the reader is created, and the
/// underlying file is closed before [`XlsxReader::open`] returns.
#[derive(Debug)]
pub struct XlsxReader {
    workbook: Workbook,
}

impl XlsxReader {
    /// Open and load a workbook from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        Ok(Self {
            workbook: Self::read_file(path)?,
        })
    }

    /// Load a workbook from any seekable reader
    pub fn new<R: Read + Seek>(reader: R) -> XlsxResult<Self> {
        Ok(Self {
            workbook: Self::read(reader)?,
        })
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.workbook.sheet_names()
    }

    /// Get a loaded worksheet by name
    pub fn worksheet(&self, sheet: &str) -> XlsxResult<&Worksheet> {
        self.workbook
            .worksheet_by_name(sheet)
            .ok_or_else(|| XlsxError::SheetNotFound(sheet.to_string()))
    }

    /// All rows of a sheet as displayed text.
    ///
    /// Cells are rendered through their number formats, so date serials read
    /// as ISO dates (see [`Worksheet::rows_with_styles`]).
    pub fn rows(&self, sheet: &str) -> XlsxResult<Vec<Vec<String>>> {
        Ok(self
            .worksheet(sheet)?
            .rows_with_styles(self.workbook.styles()))
    }

    /// Get the loaded workbook
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Consume the reader, returning the loaded workbook
    pub fn into_workbook(self) -> Workbook {
        self.workbook
    }

    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let cell_styles = Self::read_styles(&mut archive)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut workbook = Workbook::empty();

        // xf index N becomes workbook style id N
        for style in cell_styles.into_iter().skip(1) {
            workbook.new_style(style);
        }

        for (name, r_id) in &sheet_info {
            let Some(path) = sheet_paths.get(r_id) else {
                log::warn!("sheet '{}' has no worksheet relationship '{}', skipping", name, r_id);
                continue;
            };

            let mut worksheet = Worksheet::new(name.as_str());
            Self::read_worksheet(
                &mut archive,
                path,
                &mut worksheet,
                &shared_strings,
                workbook.styles(),
            )?;
            workbook.add_existing_worksheet(worksheet)?;
        }

        log::debug!(
            "read workbook with {} sheet(s), {} style(s)",
            workbook.sheet_count(),
            workbook.styles().len()
        );

        Ok(workbook)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        // Leading and trailing spaces of runs are significant
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs are not part of the cell text
        let mut in_rph = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_rph = true,
                    b"t" if in_si && !in_rph => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_rph = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current_string.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_styles<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<Vec<Style>> {
        match archive.by_name("xl/styles.xml") {
            Ok(file) => read_styles_xml(file),
            Err(_) => Ok(vec![Style::default()]),
        }
    }

    /// Read workbook.xml to get sheet names and rIds
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    let name = attr_value(&e, b"name");
                    let r_id = attr_value(&e, b"r:id");

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ folder
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read a worksheet from the archive
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        shared_strings: &[String],
        styles: &[Style],
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(false);

        let mut buf = Vec::new();

        let mut current = RawCell::default();
        let mut position = CellPosition::default();
        let mut in_cell = false;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => position.start_row(&e),
                    b"c" => {
                        in_cell = true;
                        current = RawCell::from_start(&e);
                    }
                    b"v" if in_cell => in_value = true,
                    b"is" if in_cell => in_inline_str = true,
                    b"t" if in_inline_str => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => position.start_row(&e),
                    b"c" => {
                        // Style-only cell
                        let cell = RawCell::from_start(&e);
                        let addr = position.place(&cell)?;
                        Self::process_cell(worksheet, addr, &cell, shared_strings, styles)?;
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        let addr = position.place(&current)?;
                        Self::process_cell(worksheet, addr, &current, shared_strings, styles)?;
                        in_cell = false;
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"t" if in_inline_str => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if in_value {
                        current.value = Some(e.unescape()?.into_owned());
                    } else if in_inline_text {
                        // Rich inline strings arrive as several runs
                        current
                            .value
                            .get_or_insert_with(String::new)
                            .push_str(&e.unescape()?);
                        current.cell_type = Some("inlineStr".to_string());
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    fn process_cell(
        worksheet: &mut Worksheet,
        addr: CellAddress,
        cell: &RawCell,
        shared_strings: &[String],
        styles: &[Style],
    ) -> XlsxResult<()> {

        if let Some(value) = cell.value.as_deref() {
            let cell_value = match cell.cell_type.as_deref() {
                // Shared string
                Some("s") => {
                    let idx: usize = value.parse().map_err(|_| {
                        XlsxError::InvalidFormat(format!("Invalid shared string index: {}", value))
                    })?;
                    let s = shared_strings.get(idx).ok_or_else(|| {
                        XlsxError::InvalidFormat(format!(
                            "Shared string index {} out of bounds",
                            idx
                        ))
                    })?;
                    CellValue::String(s.clone())
                }

                Some("b") => CellValue::Boolean(value == "1" || value.eq_ignore_ascii_case("true")),

                // Error literals (#N/A, #DIV/0!, ...) are kept as text
                Some("e") => CellValue::String(value.to_string()),

                Some("inlineStr") | Some("str") => CellValue::String(decode_excel_escapes(value)),

                // Number (default type or explicit "n")
                None | Some("n") => match value.parse::<f64>() {
                    Ok(n) => CellValue::Number(n),
                    Err(_) => CellValue::String(value.to_string()),
                },

                Some(other) => {
                    log::warn!("unknown cell type '{}' at {}, reading as text", other, addr);
                    CellValue::String(value.to_string())
                }
            };

            worksheet.set_cell_value_at(addr.row, addr.col, cell_value)?;
        }

        if let Some(s) = cell.style {
            if s != 0 {
                if (s as usize) >= styles.len() {
                    return Err(XlsxError::InvalidFormat(format!(
                        "Style index {} out of bounds",
                        s
                    )));
                }
                worksheet.set_cell_style_at(addr.row, addr.col, s)?;
            }
        }

        Ok(())
    }
}

/// Attributes and text gathered for one `<c>` element
#[derive(Debug, Default)]
struct RawCell {
    reference: Option<String>,
    cell_type: Option<String>,
    style: Option<u32>,
    value: Option<String>,
}

impl RawCell {
    fn from_start(e: &BytesStart<'_>) -> Self {
        Self {
            reference: attr_value(e, b"r"),
            cell_type: attr_value(e, b"t"),
            style: attr_value(e, b"s").and_then(|s| s.parse().ok()),
            value: None,
        }
    }
}

/// Where the next `<c>` lands when it has no `r` attribute.
///
/// Rows without `r` follow the previous row, and cells without `r` follow
/// the previous cell of their row.
#[derive(Debug, Default)]
struct CellPosition {
    row: Option<u32>,
    next_col: u16,
}

impl CellPosition {
    fn start_row(&mut self, e: &BytesStart<'_>) {
        let explicit = attr_value(e, b"r")
            .and_then(|r| r.parse::<u32>().ok())
            .and_then(|r| r.checked_sub(1));
        self.row = Some(explicit.unwrap_or_else(|| self.row.map_or(0, |row| row + 1)));
        self.next_col = 0;
    }

    fn place(&mut self, cell: &RawCell) -> XlsxResult<CellAddress> {
        let addr = match cell.reference.as_deref() {
            Some(reference) => CellAddress::parse(reference)?,
            None => CellAddress::new(self.row.unwrap_or(0), self.next_col),
        };
        self.row = Some(addr.row);
        self.next_col = addr.col.saturating_add(1);
        Ok(addr)
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("plain"), "plain");
        assert_eq!(decode_excel_escapes("a_x000D_b"), "a\rb");
        assert_eq!(decode_excel_escapes("a_x000a_b"), "a\nb");
        assert_eq!(decode_excel_escapes("x_x005F_y"), "x_y");
        assert_eq!(decode_excel_escapes("_x12_"), "_x12_");
        assert_eq!(decode_excel_escapes("end_x"), "end_x");
        assert_eq!(decode_excel_escapes("_x00e9_t_x00E9_"), "été");
    }
}
