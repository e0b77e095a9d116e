//! XLSX styles (styles.xml) read/write helpers

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use ledger_sheets_core::{NumberFormat, Style, Workbook};

/// First id available for custom number formats
const FIRST_CUSTOM_NUMFMT_ID: u32 = 164;

// === Writing ===

/// Workbook styles resolved to `cellXfs` entries.
///
/// Workbook style ids map one-to-one onto xf indices, so cells keep their
/// style id as the `s` attribute.
#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    /// `numFmtId` per xf, indexed like the workbook style list
    num_fmt_ids: Vec<u32>,
    /// Custom number formats: (id, code)
    numfmts: Vec<(u32, String)>,
}

impl XlsxStyleTable {
    pub(crate) fn build(workbook: &Workbook) -> Self {
        let mut numfmt_ids: HashMap<&str, u32> = HashMap::new();
        let mut numfmts: Vec<(u32, String)> = Vec::new();
        let mut next_numfmt_id = FIRST_CUSTOM_NUMFMT_ID;

        let num_fmt_ids = workbook
            .styles()
            .iter()
            .map(|style| match &style.number_format {
                NumberFormat::General => 0,
                NumberFormat::BuiltIn(id) => *id,
                NumberFormat::Custom(code) => *numfmt_ids.entry(code.as_str()).or_insert_with(|| {
                    let id = next_numfmt_id;
                    next_numfmt_id += 1;
                    numfmts.push((id, code.clone()));
                    id
                }),
            })
            .collect();

        Self {
            num_fmt_ids,
            numfmts,
        }
    }

    /// xf index for a cell's style id; unknown ids fall back to the default xf
    pub(crate) fn xf_id_for(&self, style_id: u32) -> u32 {
        if (style_id as usize) < self.num_fmt_ids.len() {
            style_id
        } else {
            0
        }
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !self.numfmts.is_empty() {
            xml.push_str(&format!("\n  <numFmts count=\"{}\">", self.numfmts.len()));
            for (id, code) in &self.numfmts {
                xml.push_str(&format!(
                    "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                    id,
                    escape_xml_attr(code)
                ));
            }
            xml.push_str("\n  </numFmts>");
        }

        // Excel requires one font, the none/gray125 fills and one empty border
        xml.push_str(
            r#"
  <fonts count="1">
    <font><sz val="11"/><name val="Calibri"/><family val="2"/></font>
  </fonts>
  <fills count="2">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
  </fills>
  <borders count="1">
    <border><left/><right/><top/><bottom/><diagonal/></border>
  </borders>
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.num_fmt_ids.len()));
        for &num_fmt_id in &self.num_fmt_ids {
            let apply = if num_fmt_id != 0 {
                " applyNumberFormat=\"1\""
            } else {
                ""
            };
            xml.push_str(&format!(
                "\n    <xf numFmtId=\"{}\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"{}/>",
                num_fmt_id, apply
            ));
        }
        xml.push_str("\n  </cellXfs>");

        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
</styleSheet>"#,
        );
        xml
    }
}

pub(crate) fn escape_xml_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// === Reading ===

/// Read the `cellXfs` table of styles.xml, resolving each xf's number format.
///
/// The returned list always starts with the default style.
pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<Vec<Style>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();

    let mut numfmts: HashMap<u32, String> = HashMap::new();
    let mut cell_xfs: Vec<Style> = Vec::new();
    let mut in_cell_xfs = false;
    let mut current_xf: Option<u32> = None;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"cellXfs" => in_cell_xfs = true,
                b"xf" if in_cell_xfs => current_xf = Some(xf_num_fmt_id(&e)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"numFmt" => {
                    let mut id = None;
                    let mut code = None;
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"numFmtId" => {
                                id = attr.unescape_value().ok().and_then(|s| s.parse().ok())
                            }
                            b"formatCode" => {
                                code = attr.unescape_value().ok().map(|s| s.to_string())
                            }
                            _ => {}
                        }
                    }
                    if let (Some(id), Some(code)) = (id, code) {
                        numfmts.insert(id, code);
                    }
                }
                b"xf" if in_cell_xfs => {
                    cell_xfs.push(resolve_style(xf_num_fmt_id(&e), &numfmts));
                }
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"xf" => {
                    if let Some(num_fmt_id) = current_xf.take() {
                        cell_xfs.push(resolve_style(num_fmt_id, &numfmts));
                    }
                }
                b"cellXfs" => in_cell_xfs = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }

        buf.clear();
    }

    if cell_xfs.is_empty() {
        cell_xfs.push(Style::default());
    }

    Ok(cell_xfs)
}

fn xf_num_fmt_id(e: &BytesStart<'_>) -> u32 {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"numFmtId")
        .and_then(|attr| attr.unescape_value().ok().and_then(|s| s.parse().ok()))
        .unwrap_or(0)
}

fn resolve_style(num_fmt_id: u32, numfmts: &HashMap<u32, String>) -> Style {
    let number_format = if let Some(code) = numfmts.get(&num_fmt_id) {
        NumberFormat::Custom(code.clone())
    } else {
        NumberFormat::from_id(num_fmt_id)
    };
    Style::new().with_number_format(number_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_styles_xml_round_trip() {
        let mut wb = Workbook::new();
        wb.new_style(Style::new().with_number_format(NumberFormat::BuiltIn(2)));
        wb.new_style(Style::new().number_format("#,##0.000"));
        wb.new_style(Style::new().number_format("#,##0.000"));
        wb.new_style(Style::new().with_number_format(NumberFormat::BuiltIn(15)));

        let table = XlsxStyleTable::build(&wb);
        let xml = table.to_styles_xml();
        assert!(xml.contains("<numFmts count=\"1\">"));
        assert!(xml.contains("<cellXfs count=\"5\">"));

        let styles = read_styles_xml(xml.as_bytes()).unwrap();
        assert_eq!(styles, wb.styles().to_vec());
    }

    #[test]
    fn test_xf_fallback() {
        let wb = Workbook::new();
        let table = XlsxStyleTable::build(&wb);
        assert_eq!(table.xf_id_for(0), 0);
        assert_eq!(table.xf_id_for(7), 0);
    }

    #[test]
    fn test_cell_style_xfs_are_ignored() {
        let xml = r#"<styleSheet>
  <cellStyleXfs count="1"><xf numFmtId="4"/></cellStyleXfs>
  <cellXfs count="2">
    <xf numFmtId="0"/>
    <xf numFmtId="9" applyNumberFormat="1"><alignment horizontal="left"/></xf>
  </cellXfs>
</styleSheet>"#;
        let styles = read_styles_xml(xml.as_bytes()).unwrap();
        assert_eq!(
            styles,
            vec![
                Style::default(),
                Style::new().with_number_format(NumberFormat::BuiltIn(9)),
            ]
        );
    }
}
