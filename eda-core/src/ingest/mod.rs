//! Parsing boundary: raw uploads and files become a [`Table`].
//!
//! Every absent-value spelling is normalised to [`Value::Missing`] here, so
//! nothing downstream has to guess.

pub mod csv_input;
pub mod json_input;
pub mod parquet_input;

use crate::table::{Table, Value};
use eda_common::{EdaError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
    Parquet,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "parquet" | "pq" => Ok(Format::Parquet),
            other => Err(EdaError::validation(format!(
                "unsupported file extension '{other}' for {} (expected csv, json or parquet)",
                path.display()
            ))),
        }
    }
}

pub fn parse_bytes(format: Format, data: &[u8]) -> Result<Table> {
    let table = match format {
        Format::Csv => csv_input::parse_csv(data)?,
        Format::Json => json_input::parse_json(data)?,
        Format::Parquet => parquet_input::parse_parquet(data)?,
    };
    tracing::debug!(?format, rows = table.n_rows(), cols = table.n_cols(), "parsed table");
    Ok(table)
}

pub fn load_path(path: &Path) -> Result<Table> {
    let format = Format::from_path(path)?;
    let data = std::fs::read(path)?;
    parse_bytes(format, &data)
}

const NA_TOKENS: &[&str] = &["", "NA", "N/A", "#N/A", "NaN", "nan", "null", "NULL", "None"];

/// Maps one textual cell to a [`Value`].
pub fn parse_cell(raw: &str) -> Value {
    if NA_TOKENS.contains(&raw) {
        return Value::Missing;
    }
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<f64>() {
        if v.is_finite() {
            return Value::Number(v);
        }
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Text(raw.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn na_tokens_are_missing() {
        for tok in NA_TOKENS {
            assert_eq!(parse_cell(tok), Value::Missing, "token {tok:?}");
        }
    }

    #[test]
    fn numbers_bools_and_text() {
        assert_eq!(parse_cell("42"), Value::Number(42.0));
        assert_eq!(parse_cell(" -1.5 "), Value::Number(-1.5));
        assert_eq!(parse_cell("1e3"), Value::Number(1000.0));
        assert_eq!(parse_cell("TRUE"), Value::Bool(true));
        assert_eq!(parse_cell("False"), Value::Bool(false));
        assert_eq!(parse_cell("Moscow"), Value::Text("Moscow".into()));
        assert_eq!(parse_cell("inf"), Value::Text("inf".into()));
    }

    #[test]
    fn whitespace_is_not_missing() {
        assert_eq!(parse_cell(" "), Value::Text(" ".into()));
    }

    #[test]
    fn format_by_extension() {
        assert_eq!(Format::from_path(Path::new("a/b.CSV")).unwrap(), Format::Csv);
        assert_eq!(Format::from_path(Path::new("x.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("x.parquet")).unwrap(), Format::Parquet);
        assert!(Format::from_path(Path::new("x.xlsx")).is_err());
        assert!(Format::from_path(Path::new("noext")).is_err());
    }
}
