//! Subtype code → tooltype label lookup
//!
//! The table is loaded once per run and handed to the reclassification stage.
//! Two file shapes are accepted:
//!
//! - YAML (`.yaml`/`.yml`): a `code: label` map, a list of `{code, label}`
//!   entries, or a list of `[id, code, label]` rows.
//! - Anything else: `;`-delimited `id;code;label` (or `code;label`) lines.

use crate::error::{ToolsheetError, ToolsheetResult};
use crate::schema::DELIMITER;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Key → value access used by the reclassifier
pub trait ToolTypeLookup {
    fn label(&self, code: &str) -> Option<&str>;
}

impl ToolTypeLookup for HashMap<String, String> {
    fn label(&self, code: &str) -> Option<&str> {
        self.get(code).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub code: String,
    pub label: String,
}

/// The loaded mapping. Later entries win over earlier ones with the same code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolTypeMapping {
    entries: Vec<MappingEntry>,
    index: HashMap<String, usize>,
}

impl ToolTypeLookup for ToolTypeMapping {
    fn label(&self, code: &str) -> Option<&str> {
        self.index
            .get(code)
            .map(|&idx| self.entries[idx].label.as_str())
    }
}

impl ToolTypeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: MappingEntry) {
        match self.index.get(&entry.code) {
            Some(&idx) => self.entries[idx] = entry,
            None => {
                self.index.insert(entry.code.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a mapping file, choosing the format by extension
    pub fn load(path: &Path) -> ToolsheetResult<Self> {
        let content = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_delimited_str(&content)
        }
    }

    pub fn from_yaml_str(content: &str) -> ToolsheetResult<Self> {
        let yaml: Value = serde_yaml::from_str(content)?;
        let mut mapping = Self::new();

        match yaml {
            Value::Null => {}
            Value::Mapping(map) => {
                for (code, label) in map {
                    mapping.insert(MappingEntry {
                        code: scalar(&code)?,
                        label: scalar(&label)?,
                    });
                }
            }
            Value::Sequence(items) => {
                for item in items {
                    mapping.insert(entry_from_yaml(&item)?);
                }
            }
            other => {
                return Err(ToolsheetError::Mapping(format!(
                    "expected a map or a list, found {}",
                    kind(&other)
                )))
            }
        }

        Ok(mapping)
    }

    pub fn from_delimited_str(content: &str) -> ToolsheetResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut mapping = Self::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let (code, label) = match record.len() {
                0 => continue,
                1 if record[0].is_empty() => continue,
                2 => (&record[0], &record[1]),
                n if n >= 3 => (&record[1], &record[2]),
                _ => {
                    return Err(ToolsheetError::Mapping(format!(
                        "line {}: expected 'id;code;label' or 'code;label'",
                        line + 1
                    )))
                }
            };
            mapping.insert(MappingEntry {
                code: code.to_string(),
                label: label.to_string(),
            });
        }
        Ok(mapping)
    }
}

fn entry_from_yaml(item: &Value) -> ToolsheetResult<MappingEntry> {
    match item {
        Value::Mapping(map) => {
            let field = |name: &str| {
                map.get(name)
                    .ok_or_else(|| ToolsheetError::Mapping(format!("entry without '{name}'")))
                    .and_then(scalar)
            };
            Ok(MappingEntry {
                code: field("code")?,
                label: field("label")?,
            })
        }
        Value::Sequence(row) if row.len() >= 3 => Ok(MappingEntry {
            code: scalar(&row[1])?,
            label: scalar(&row[2])?,
        }),
        Value::Sequence(row) if row.len() == 2 => Ok(MappingEntry {
            code: scalar(&row[0])?,
            label: scalar(&row[1])?,
        }),
        other => Err(ToolsheetError::Mapping(format!(
            "unsupported entry: {}",
            kind(other)
        ))),
    }
}

/// Codes are often numeric in YAML; every scalar is taken as text
fn scalar(value: &Value) -> ToolsheetResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ToolsheetError::Mapping(format!(
            "expected a scalar, found {}",
            kind(other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "map",
        Value::Tagged(_) => "tagged value",
    }
}
