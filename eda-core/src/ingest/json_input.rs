use crate::table::{Column, Table, Value};
use eda_common::{EdaError, Result};
use serde_json::{Map, Value as Json};

fn cell(v: &Json) -> Value {
    match v {
        Json::Null => Value::Missing,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .map_or_else(|| Value::Text(n.to_string()), Value::Number),
        Json::String(s) => Value::Text(s.clone()),
        nested => Value::Text(nested.to_string()),
    }
}

/// `{"col": [..], ...}` with one array per column.
pub fn table_from_columns(obj: &Map<String, Json>) -> Result<Table> {
    let mut columns = Vec::with_capacity(obj.len());
    for (name, values) in obj {
        let Json::Array(items) = values else {
            return Err(EdaError::parse(format!("column '{name}' is not an array")));
        };
        columns.push(Column::new(name.clone(), items.iter().map(cell).collect()));
    }
    Table::new(columns)
}

/// `[{"col": v, ...}, ...]`; keys absent from a record become missing cells.
pub fn table_from_records(records: &[Json]) -> Result<Table> {
    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let Json::Object(fields) = rec else {
            return Err(EdaError::parse(format!("record {i} is not an object")));
        };
        for key in fields.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }
    let columns = names
        .into_iter()
        .map(|name| {
            let values = records
                .iter()
                .map(|rec| rec.get(&name).map_or(Value::Missing, cell))
                .collect();
            Column::new(name, values)
        })
        .collect();
    Table::new(columns)
}

pub fn parse_json(data: &[u8]) -> Result<Table> {
    let doc: Json =
        serde_json::from_slice(data).map_err(|e| EdaError::parse(format!("invalid JSON: {e}")))?;
    match &doc {
        Json::Object(obj) => table_from_columns(obj),
        Json::Array(records) => table_from_records(records),
        _ => Err(EdaError::parse(
            "expected an object of column arrays or an array of records",
        )),
    }
}
