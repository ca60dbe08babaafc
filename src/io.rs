//! Reading and writing delimited count tables.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::debug;
use serde::Serialize;

use crate::{
    config::Delimiter,
    error::{MedratError, Result},
    table::WideTable,
};

/// Loads a wide count table from a file
pub fn read_table<P: AsRef<Path>>(path: P, delimiter: Delimiter) -> Result<WideTable> {
    let path = path.as_ref();
    debug!("Reading count table from {}", path.display());
    let file = File::open(path)?;
    parse_table(BufReader::new(file), delimiter)
}

/// Parses a wide count table
///
/// The header names the identifier column followed by one column per sample.
/// Every following line holds a gene identifier and one count per sample.
pub fn parse_table<R: Read>(mut reader: R, delimiter: Delimiter) -> Result<WideTable> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = String::from_utf8(bytes).map_err(|err| {
        let valid = err.utf8_error().valid_up_to();
        let line = err.as_bytes()[..valid].iter().filter(|b| **b == b'\n').count() + 1;
        MedratError::MalformedInput(format!("line {} is not valid UTF-8", line))
    })?;

    let header_line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| MedratError::MalformedInput("empty input".to_string()))?;
    let delimiter = delimiter.resolve(header_line);
    debug!("Using delimiter {:?}", delimiter);

    let (header, records) = match delimiter.byte() {
        Some(byte) => split_delimited(&text, byte)?,
        None => split_whitespace(&text),
    };
    build_table(header, records)
}

/// Splits tab- or comma-separated text into a header and numbered records
fn split_delimited(text: &str, byte: u8) -> Result<(Vec<String>, Vec<(usize, Vec<String>)>)> {
    let mut reader = ReaderBuilder::new()
        .delimiter(byte)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let header = reader.headers()?.iter().map(String::from).collect::<Vec<_>>();
    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        records.push((line, record.iter().map(String::from).collect::<Vec<_>>()));
    }
    Ok((header, records))
}

/// Splits text on runs of whitespace, skipping blank lines
fn split_whitespace(text: &str) -> (Vec<String>, Vec<(usize, Vec<String>)>) {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            (
                i + 1,
                line.split_whitespace().map(String::from).collect::<Vec<_>>(),
            )
        });
    let header = lines.next().map(|(_, fields)| fields).unwrap_or_default();
    (header, lines.collect())
}

fn build_table(header: Vec<String>, records: Vec<(usize, Vec<String>)>) -> Result<WideTable> {
    let mut header = header.into_iter();
    let id_column = match header.next() {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(MedratError::MalformedInput(
                "header is missing the identifier column".to_string(),
            ))
        }
    };
    let samples = header.collect::<Vec<_>>();
    if samples.is_empty() {
        return Err(MedratError::MalformedInput(format!(
            "header has identifier column '{}' but no sample columns",
            id_column
        )));
    }

    let mut genes = Vec::with_capacity(records.len());
    let mut rows = Vec::with_capacity(records.len());
    for (line, fields) in records {
        if fields.len() != samples.len() + 1 {
            return Err(MedratError::MalformedInput(format!(
                "line {} has {} fields, expected {}",
                line,
                fields.len(),
                samples.len() + 1
            )));
        }
        let mut fields = fields.into_iter();
        let gene = fields.next().unwrap_or_default();
        if gene.is_empty() {
            return Err(MedratError::MalformedInput(format!(
                "line {} has an empty identifier",
                line
            )));
        }
        let row = fields
            .zip(samples.iter())
            .map(|(cell, sample)| {
                cell.parse::<f64>().map_err(|_| {
                    MedratError::MalformedInput(format!(
                        "line {}: non-numeric count '{}' for gene '{}' in sample '{}'",
                        line, cell, gene, sample
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        genes.push(gene);
        rows.push(row);
    }

    WideTable::new(id_column, genes, samples, rows)
}

/// Writes a wide table with a header row
///
/// `Auto` and `Whitespace` are written tab-separated.
pub fn write_table<W: Write>(writer: W, table: &WideTable, delimiter: Delimiter) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter.byte().unwrap_or(b'\t'))
        .from_writer(writer);

    let header = std::iter::once(table.id_column())
        .chain(table.samples().iter().map(String::as_str));
    writer.write_record(header)?;
    for (i, gene) in table.genes().iter().enumerate() {
        let values = table.row(i).iter().map(|v| v.to_string());
        writer.write_record(std::iter::once(gene.clone()).chain(values))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes a wide table to a file
pub fn write_table_path<P: AsRef<Path>>(
    path: P,
    table: &WideTable,
    delimiter: Delimiter,
) -> Result<()> {
    let path = path.as_ref();
    debug!("Writing table to {}", path.display());
    let file = File::create(path)?;
    write_table(BufWriter::new(file), table, delimiter)
}

/// Writes any long table as tab-separated records with a header
pub fn write_long<W: Write, R: Serialize>(writer: W, records: &[R]) -> Result<()> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
