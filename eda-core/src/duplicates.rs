use crate::table::{Table, Value};
use std::collections::HashSet;
use xxhash_rust::xxh3::xxh3_64;

/// Fingerprint of one row across all columns.
fn hash_row(table: &Table, row: usize) -> u64 {
    let mut row_bytes = Vec::new();
    for col in table.columns() {
        match &col.values[row] {
            Value::Missing => row_bytes.push(0xFF),
            Value::Number(v) => {
                row_bytes.push(0x01);
                row_bytes.extend_from_slice(&(v + 0.0).to_le_bytes());
            }
            Value::Bool(b) => {
                row_bytes.push(0x02);
                row_bytes.push(u8::from(*b));
            }
            Value::Text(s) => {
                // length prefix keeps ("ab","c") apart from ("a","bc")
                row_bytes.push(0x03);
                row_bytes.extend_from_slice(&(s.len() as u64).to_le_bytes());
                row_bytes.extend_from_slice(s.as_bytes());
            }
        }
    }
    xxh3_64(&row_bytes)
}

/// Rows identical to an earlier row.
pub fn count_duplicate_rows(table: &Table) -> usize {
    if table.n_cols() == 0 {
        return 0;
    }
    let mut seen = HashSet::with_capacity(table.n_rows());
    (0..table.n_rows())
        .filter(|&row| !seen.insert(hash_row(table, row)))
        .count()
}
