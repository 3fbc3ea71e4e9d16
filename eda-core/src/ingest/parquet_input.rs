use crate::table::{Column, Table, Value};
use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, LargeStringArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use bytes::Bytes;
use eda_common::{EdaError, Result};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

fn downcast<'a, T: 'static>(col: &'a dyn Array, what: &str) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| EdaError::parse(format!("column is not a {what} array")))
}

fn number_cell(v: f64) -> Value {
    if v.is_nan() {
        Value::Missing
    } else if v.is_finite() {
        Value::Number(v)
    } else {
        Value::Text(v.to_string())
    }
}

fn append_values(col: &ArrayRef, out: &mut Vec<Value>) -> Result<()> {
    match col.data_type() {
        dt if dt.is_numeric() => {
            let floats = cast(col, &DataType::Float64)?;
            let arr = downcast::<Float64Array>(floats.as_ref(), "float64")?;
            out.extend((0..arr.len()).map(|i| {
                if arr.is_null(i) {
                    Value::Missing
                } else {
                    number_cell(arr.value(i))
                }
            }));
        }
        DataType::Boolean => {
            let arr = downcast::<BooleanArray>(col.as_ref(), "boolean")?;
            out.extend((0..arr.len()).map(|i| {
                if arr.is_null(i) {
                    Value::Missing
                } else {
                    Value::Bool(arr.value(i))
                }
            }));
        }
        DataType::Utf8 => {
            let arr = downcast::<StringArray>(col.as_ref(), "utf8")?;
            out.extend(arr.iter().map(|s| s.map_or(Value::Missing, Value::from)));
        }
        DataType::LargeUtf8 => {
            let arr = downcast::<LargeStringArray>(col.as_ref(), "large utf8")?;
            out.extend(arr.iter().map(|s| s.map_or(Value::Missing, Value::from)));
        }
        _ => {
            // dates, timestamps, nested: keep their display form
            let options = FormatOptions::default();
            let fmt = ArrayFormatter::try_new(col.as_ref(), &options)?;
            out.extend((0..col.len()).map(|i| {
                if col.is_null(i) {
                    Value::Missing
                } else {
                    Value::Text(fmt.value(i).to_string())
                }
            }));
        }
    }
    Ok(())
}

pub fn parse_parquet(data: &[u8]) -> Result<Table> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::copy_from_slice(data))?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.with_batch_size(65536).build()?;
    let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    for batch in reader {
        let batch = batch?;
        for (out, col) in values.iter_mut().zip(batch.columns()) {
            append_values(col, out)?;
        }
    }
    Table::new(
        names
            .into_iter()
            .zip(values)
            .map(|(name, vals)| Column::new(name, vals))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_rejected() {
        assert!(parse_parquet(b"definitely not parquet").is_err());
    }

    #[test]
    fn nan_is_missing() {
        assert_eq!(number_cell(f64::NAN), Value::Missing);
        assert_eq!(number_cell(2.0), Value::Number(2.0));
        assert_eq!(number_cell(f64::INFINITY), Value::Text("inf".into()));
    }
}
