//! `;`-delimited table files

use crate::error::ToolsheetResult;
use crate::schema::DELIMITER;
use crate::types::{RawTable, Table};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn writer<W: Write>(sink: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(sink)
}

/// Write records without header
pub fn write_raw<W: Write>(sink: W, table: &RawTable) -> ToolsheetResult<()> {
    let mut out = writer(sink);
    for record in &table.records {
        out.write_record(record)?;
    }
    out.flush()?;
    Ok(())
}

/// Write the header line followed by the records
pub fn write_table<W: Write>(sink: W, table: &Table) -> ToolsheetResult<()> {
    let mut out = writer(sink);
    out.write_record(&table.header)?;
    for record in &table.records {
        out.write_record(record)?;
    }
    out.flush()?;
    Ok(())
}

/// Read a headerless table back as text, without any type inference
pub fn read_raw<R: std::io::Read>(source: R) -> ToolsheetResult<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(String::from).collect());
    }
    Ok(RawTable::new(records))
}

pub fn write_raw_file(path: &Path, table: &RawTable) -> ToolsheetResult<()> {
    write_raw(BufWriter::new(File::create(path)?), table)
}

pub fn write_table_file(path: &Path, table: &Table) -> ToolsheetResult<()> {
    write_table(BufWriter::new(File::create(path)?), table)
}

pub fn read_raw_file(path: &Path) -> ToolsheetResult<RawTable> {
    read_raw(File::open(path)?)
}
