//! Workbook loader - active sheet of an .xlsx file → Grid

use crate::error::{ToolsheetError, ToolsheetResult};
use crate::excel::styles::{attribute, filled_cells, xml_reader, StyleSheet};
use crate::types::{Cell, CellValue, Grid};
use calamine::{open_workbook, Data, Reader, Xlsx};
use quick_xml::events::Event;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const STYLES_PART: &str = "xl/styles.xml";

/// Whole numbers beyond this stay floats
const MAX_EXACT_INT: f64 = 1e15;

/// Loads the active worksheet: cached values through calamine, fills from the
/// package parts
pub struct WorkbookLoader {
    path: PathBuf,
}

/// Sheet entry of `xl/workbook.xml`
#[derive(Debug, Clone, PartialEq, Eq)]
struct SheetEntry {
    name: String,
    rel_id: String,
}

/// What `xl/workbook.xml` says about the sheets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct WorkbookInfo {
    active_tab: usize,
    sheets: Vec<SheetEntry>,
}

impl WorkbookLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the active sheet as a Grid
    pub fn load(&self) -> ToolsheetResult<Grid> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e: calamine::XlsxError| ToolsheetError::Load(e.to_string()))?;

        let file = File::open(&self.path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;

        let info = match read_part(&mut archive, WORKBOOK_PART)? {
            Some(xml) => parse_workbook(xml.as_slice())?,
            None => return Err(ToolsheetError::Load("workbook.xml not found".to_string())),
        };
        let sheet = info
            .sheets
            .get(info.active_tab)
            .or_else(|| info.sheets.first())
            .ok_or_else(|| ToolsheetError::Load("workbook has no sheets".to_string()))?
            .clone();

        let filled = self.read_fills(&mut archive, &sheet)?;
        debug!(sheet = %sheet.name, filled = filled.len(), "resolved cell fills");

        let range = workbook.worksheet_range(&sheet.name)?;
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let cells = range.used_cells().map(|(row, col, data)| {
            Cell::new(row + row_offset, col + col_offset, convert_data(data))
        });
        let grid = Grid::from_cells(cells, filled);

        debug!(
            sheet = %sheet.name,
            rows = grid.height(),
            columns = grid.width(),
            "loaded active sheet"
        );
        Ok(grid)
    }

    fn read_fills<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        sheet: &SheetEntry,
    ) -> ToolsheetResult<HashSet<(usize, usize)>> {
        let styles = match read_part(archive, STYLES_PART)? {
            Some(xml) => StyleSheet::parse(xml.as_slice())?,
            None => return Ok(HashSet::new()),
        };

        let targets = match read_part(archive, WORKBOOK_RELS_PART)? {
            Some(xml) => parse_relationships(xml.as_slice())?,
            None => HashMap::new(),
        };
        let Some(target) = targets.get(&sheet.rel_id) else {
            return Ok(HashSet::new());
        };

        match read_part(archive, &resolve_target(target))? {
            Some(xml) => filled_cells(xml.as_slice(), &styles),
            None => Ok(HashSet::new()),
        }
    }
}

/// Convert a calamine value to a CellValue
pub fn convert_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INT {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::Text(format_datetime(value)),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

fn format_datetime(value: chrono::NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Read a package part, matching the name case-insensitively
fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> ToolsheetResult<Option<Vec<u8>>> {
    let path = archive
        .file_names()
        .find(|file_name| name.eq_ignore_ascii_case(file_name))
        .map(|file_name| file_name.to_owned());
    let Some(path) = path else {
        return Ok(None);
    };

    match archive.by_name(&path) {
        Ok(mut file) => {
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;
            Ok(Some(content))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Relationship targets are relative to `xl/` unless absolute
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target.trim_start_matches("./")),
    }
}

fn parse_workbook(xml: &[u8]) -> ToolsheetResult<WorkbookInfo> {
    let mut reader = xml_reader(xml);
    let mut buf = Vec::new();
    let mut info = WorkbookInfo::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"workbookView" => {
                    if let Some(tab) = attribute(&e, b"activeTab").and_then(|v| v.parse().ok()) {
                        info.active_tab = tab;
                    }
                }
                b"sheet" => {
                    if let (Some(name), Some(rel_id)) =
                        (attribute(&e, b"name"), attribute(&e, b"id"))
                    {
                        info.sheets.push(SheetEntry { name, rel_id });
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(info)
}

fn parse_relationships(xml: &[u8]) -> ToolsheetResult<HashMap<String, String>> {
    let mut reader = xml_reader(xml);
    let mut buf = Vec::new();
    let mut targets = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attribute(&e, b"Id"), attribute(&e, b"Target"))
                {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(targets)
}
