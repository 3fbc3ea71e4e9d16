use super::parse_cell;
use crate::table::{Column, Table, Value};
use csv::{ErrorKind, ReaderBuilder};
use eda_common::{EdaError, Result};

fn map_csv_error(e: csv::Error) -> EdaError {
    match e.kind() {
        ErrorKind::Utf8 { pos, .. } => EdaError::parse(format!(
            "file is not valid UTF-8 (record {})",
            pos.as_ref().map_or(0, |p| p.record())
        )),
        ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => EdaError::parse(format!(
            "line {}: expected {expected_len} fields, found {len}",
            pos.as_ref().map_or(0, |p| p.line())
        )),
        _ => EdaError::Csv(e),
    }
}

/// Parses a CSV document whose first record is the header.
pub fn parse_csv(data: &[u8]) -> Result<Table> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(data);
    let headers: Vec<String> = reader
        .headers()
        .map_err(map_csv_error)?
        .iter()
        .map(str::to_owned)
        .collect();
    if headers.is_empty() {
        return Err(EdaError::EmptyInput("no columns to parse from file".into()));
    }
    let mut values: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(map_csv_error)?;
        for (col, field) in values.iter_mut().zip(record.iter()) {
            col.push(parse_cell(field));
        }
    }
    let columns = headers
        .into_iter()
        .zip(values)
        .map(|(name, vals)| Column::new(name, vals))
        .collect();
    Table::new(columns)
}
