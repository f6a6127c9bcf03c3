//! Fill detection from the raw package parts
//!
//! calamine exposes cached values only, so background fills are resolved here:
//! `xl/styles.xml` maps a cell format (`s` attribute) to a fill, and the
//! worksheet part maps each cell to its format.

use crate::error::ToolsheetResult;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::HashSet;
use std::io::BufRead;

/// Background color written by "no fill"
const NO_FILL_COLOR: &str = "00000000";

/// A `<fill>` entry of the stylesheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillStyle {
    /// `patternType` of the pattern fill
    pub pattern: Option<String>,
    /// `bgColor` as `rgb`, `indexed:N`, `theme:N` or `auto`
    pub background: Option<String>,
}

impl FillStyle {
    /// A declared background color other than "no fill". A missing `bgColor`
    /// reads as "no fill" whatever the pattern.
    pub fn is_filled(&self) -> bool {
        self.background
            .as_deref()
            .is_some_and(|color| color != NO_FILL_COLOR)
    }
}

/// Fill part of `xl/styles.xml`
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    fills: Vec<FillStyle>,
    /// `fillId` of each `cellXfs` entry, indexed by the cell `s` attribute
    cell_xf_fills: Vec<usize>,
}

impl StyleSheet {
    pub fn parse<R: BufRead>(input: R) -> ToolsheetResult<Self> {
        let mut reader = xml_reader(input);
        let mut buf = Vec::new();

        let mut sheet = StyleSheet::default();
        let mut in_fills = false;
        let mut in_cell_xfs = false;
        let mut current: Option<FillStyle> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"fills" => in_fills = true,
                    b"cellXfs" => in_cell_xfs = true,
                    b"fill" if in_fills => current = Some(FillStyle::default()),
                    b"patternFill" => {
                        if let Some(fill) = current.as_mut() {
                            fill.pattern = attribute(&e, b"patternType");
                        }
                    }
                    b"bgColor" => {
                        if let Some(fill) = current.as_mut() {
                            fill.background = color(&e);
                        }
                    }
                    b"xf" if in_cell_xfs => {
                        let fill_id = attribute(&e, b"fillId")
                            .and_then(|v| v.parse().ok())
                            .unwrap_or(0);
                        sheet.cell_xf_fills.push(fill_id);
                    }
                    _ => {}
                },
                Event::End(e) => match e.local_name().as_ref() {
                    b"fills" => in_fills = false,
                    b"cellXfs" => in_cell_xfs = false,
                    b"fill" => {
                        if let Some(fill) = current.take() {
                            sheet.fills.push(fill);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(sheet)
    }

    pub fn fills(&self) -> &[FillStyle] {
        &self.fills
    }

    /// True when cell format `xf` points at a filled background
    pub fn xf_has_fill(&self, xf: usize) -> bool {
        self.cell_xf_fills
            .get(xf)
            .and_then(|fill_id| self.fills.get(*fill_id))
            .is_some_and(FillStyle::is_filled)
    }
}

/// Positions (0-based row, col) of the worksheet cells whose format is filled
pub fn filled_cells<R: BufRead>(
    input: R,
    styles: &StyleSheet,
) -> ToolsheetResult<HashSet<(usize, usize)>> {
    let mut reader = xml_reader(input);
    let mut buf = Vec::new();
    let mut filled = HashSet::new();

    // Fallback positions for cells written without an `r` attribute
    let mut row = 0usize;
    let mut next_col = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    if let Some(r) = attribute(&e, b"r").and_then(|v| v.parse::<usize>().ok()) {
                        row = r.saturating_sub(1);
                    }
                    next_col = 0;
                }
                b"c" => {
                    let (cell_row, cell_col) = attribute(&e, b"r")
                        .and_then(|r| parse_cell_ref(&r))
                        .unwrap_or((row, next_col));
                    next_col = cell_col + 1;

                    let xf = attribute(&e, b"s").and_then(|v| v.parse::<usize>().ok());
                    if xf.is_some_and(|xf| styles.xf_has_fill(xf)) {
                        filled.insert((cell_row, cell_col));
                    }
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"row" => row += 1,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(filled)
}

/// Convert an A1 reference to 0-based (row, col)
pub fn parse_cell_ref(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }

    let mut col = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }

    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

pub(crate) fn xml_reader<R: BufRead>(input: R) -> Reader<R> {
    let mut reader = Reader::from_reader(input);
    let config = reader.config_mut();
    config.expand_empty_elements = true;
    config.check_end_names = false;
    config.trim_text(true);
    reader
}

pub(crate) fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .and_then(|attr| attr.decode_and_unescape_value(e.decoder()).ok())
        .map(|v| v.into_owned())
}

fn color(e: &BytesStart<'_>) -> Option<String> {
    if let Some(rgb) = attribute(e, b"rgb") {
        return Some(rgb);
    }
    if let Some(indexed) = attribute(e, b"indexed") {
        return Some(format!("indexed:{indexed}"));
    }
    if let Some(theme) = attribute(e, b"theme") {
        return Some(format!("theme:{theme}"));
    }
    attribute(e, b"auto").map(|_| "auto".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fills count="4">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
    <fill><patternFill patternType="solid"><fgColor rgb="FFFFFF00"/><bgColor indexed="64"/></patternFill></fill>
    <fill><patternFill patternType="solid"><fgColor rgb="FF00FF00"/><bgColor rgb="00000000"/></patternFill></fill>
  </fills>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="2" borderId="0"/></cellStyleXfs>
  <cellXfs count="4">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="0" fontId="0" fillId="2" borderId="0" xfId="0" applyFill="1"/>
    <xf numFmtId="0" fontId="0" fillId="1" borderId="0" xfId="0"/>
    <xf numFmtId="0" fontId="0" fillId="3" borderId="0" xfId="0" applyFill="1"/>
  </cellXfs>
  <dxfs count="1"><dxf><fill><patternFill><bgColor rgb="FFFF0000"/></patternFill></fill></dxf></dxfs>
</styleSheet>"#;

    #[test]
    fn test_parse_fills_and_cell_formats() {
        let styles = StyleSheet::parse(STYLES.as_bytes()).unwrap();

        // dxf fills are not part of the fill table
        assert_eq!(styles.fills().len(), 4);
        assert_eq!(styles.fills()[2].background.as_deref(), Some("indexed:64"));

        assert!(!styles.xf_has_fill(0));
        assert!(styles.xf_has_fill(1));
        assert!(!styles.xf_has_fill(2));
        assert!(!styles.xf_has_fill(3));
        assert!(!styles.xf_has_fill(99));
    }

    #[test]
    fn test_fill_style_without_background() {
        let solid = FillStyle {
            pattern: Some("solid".into()),
            background: None,
        };
        let gray = FillStyle {
            pattern: Some("gray125".into()),
            background: None,
        };
        assert!(!solid.is_filled());
        assert!(!gray.is_filled());
        assert!(!FillStyle::default().is_filled());
    }

    #[test]
    fn test_filled_cells_from_sheet() {
        let styles = StyleSheet::parse(STYLES.as_bytes()).unwrap();
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="2"><c r="C2" t="s"><v>0</v></c><c r="D2" s="1"/><c r="E2" s="0"/></row>
    <row r="3"><c r="H3" s="1"><v>1</v></c></row>
    <row><c s="1"/></row>
  </sheetData>
</worksheet>"#;

        let filled = filled_cells(sheet.as_bytes(), &styles).unwrap();
        assert!(filled.contains(&(1, 3)));
        assert!(filled.contains(&(2, 7)));
        assert!(filled.contains(&(3, 0)));
        assert!(!filled.contains(&(1, 4)));
        assert_eq!(filled.len(), 3);
    }

    #[test]
    fn test_solid_fill_without_background_is_not_filled() {
        let styles = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fills count="3">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="solid"><fgColor rgb="FFFF0000"/></patternFill></fill>
    <fill><patternFill patternType="solid"><fgColor rgb="FFFF0000"/><bgColor rgb="FF00FF00"/></patternFill></fill>
  </fills>
  <cellXfs count="3">
    <xf fillId="0"/><xf fillId="1"/><xf fillId="2"/>
  </cellXfs>
</styleSheet>"#;
        let styles = StyleSheet::parse(styles.as_bytes()).unwrap();
        assert_eq!(styles.fills()[1].background, None);
        assert!(!styles.xf_has_fill(1));
        assert!(styles.xf_has_fill(2));
    }

    #[test]
    fn test_attribute_unescapes_values() {
        let xml = r#"<sheets><sheet name="R&amp;D &lt;tools&gt;" r:id="rId3"/></sheets>"#;
        let mut reader = xml_reader(xml.as_bytes());
        let mut buf = Vec::new();
        let mut found = None;
        loop {
            match reader.read_event_into(&mut buf).unwrap() {
                Event::Start(e) if e.local_name().as_ref() == b"sheet" => {
                    found = Some((attribute(&e, b"name"), attribute(&e, b"id")));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        assert_eq!(
            found,
            Some((Some("R&D <tools>".to_string()), Some("rId3".to_string())))
        );
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("D5"), Some((4, 3)));
        assert_eq!(parse_cell_ref("AA10"), Some((9, 26)));
        assert_eq!(parse_cell_ref("ad3"), Some((2, 29)));
        assert_eq!(parse_cell_ref("12"), None);
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("B"), None);
    }
}
