use crate::table::Table;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissingEntry {
    pub missing_count: usize,
    pub missing_share: f64,
}

/// Per-column missingness, keyed by column name in table order.
/// Serializes as a JSON object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MissingTable {
    n_rows: usize,
    entries: Vec<(String, MissingEntry)>,
}

impl MissingTable {
    pub fn get(&self, column: &str) -> Option<&MissingEntry> {
        self.entries.iter().find(|(n, _)| n == column).map(|(_, e)| e)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MissingEntry)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_missing(&self) -> usize {
        self.entries.iter().map(|(_, e)| e.missing_count).sum()
    }

    /// Missing cells over all cells; 0.0 for an empty table.
    pub fn overall_share(&self) -> f64 {
        let cells = self.n_rows * self.entries.len();
        if cells == 0 {
            0.0
        } else {
            self.total_missing() as f64 / cells as f64
        }
    }

    /// Largest per-column share; 0.0 without columns.
    pub fn max_share(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, e)| e.missing_share)
            .fold(0.0, f64::max)
    }
}

impl Serialize for MissingTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

pub fn missing_table(table: &Table) -> MissingTable {
    let n_rows = table.n_rows();
    let entries = table
        .columns()
        .iter()
        .map(|c| {
            let missing_count = c.missing_count();
            let missing_share = if n_rows == 0 {
                0.0
            } else {
                missing_count as f64 / n_rows as f64
            };
            (
                c.name.clone(),
                MissingEntry {
                    missing_count,
                    missing_share,
                },
            )
        })
        .collect();
    MissingTable { n_rows, entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, Value};

    fn table() -> Table {
        Table::new(vec![
            Column::new("age", vec![10.0.into(), Value::Missing, 30.0.into(), 40.0.into()]),
            Column::new("gone", vec![Value::Missing; 4]),
            Column::new("full", vec!["a".into(); 4]),
        ])
        .unwrap()
    }

    #[test]
    fn counts_and_shares() {
        let m = missing_table(&table());
        assert_eq!(m.get("age").unwrap().missing_count, 1);
        assert_eq!(m.get("age").unwrap().missing_share, 0.25);
        assert_eq!(m.get("gone").unwrap().missing_share, 1.0);
        assert_eq!(m.get("full").unwrap().missing_share, 0.0);
        assert!(m.get("nope").is_none());
    }

    #[test]
    fn aggregates() {
        let m = missing_table(&table());
        assert_eq!(m.total_missing(), 5);
        assert!((m.overall_share() - 5.0 / 12.0).abs() < 1e-12);
        assert_eq!(m.max_share(), 1.0);
    }

    #[test]
    fn zero_rows_share_is_zero() {
        let t = Table::new(vec![Column::new("a", Vec::new())]).unwrap();
        let m = missing_table(&t);
        assert_eq!(m.get("a").unwrap().missing_share, 0.0);
        assert_eq!(m.overall_share(), 0.0);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let json = serde_json::to_string(&missing_table(&table())).unwrap();
        assert!(json.starts_with(r#"{"age":{"missing_count":1,"missing_share":0.25},"gone""#), "{json}");
    }
}
