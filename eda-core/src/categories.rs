use crate::profile::{ColumnKind, FrequencyCounter, FrequencyEntry};
use crate::table::Table;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Top values per categorical column, in table order. Serializes as an
/// object keyed by column name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopCategories {
    tables: Vec<(String, Vec<FrequencyEntry>)>,
}

impl TopCategories {
    pub fn get(&self, column: &str) -> Option<&[FrequencyEntry]> {
        self.tables
            .iter()
            .find(|(n, _)| n == column)
            .map(|(_, t)| t.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FrequencyEntry])> {
        self.tables.iter().map(|(n, t)| (n.as_str(), t.as_slice()))
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Serialize for TopCategories {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for (name, entries) in &self.tables {
            map.serialize_entry(name, entries)?;
        }
        map.end()
    }
}

/// For the first `max_columns` categorical columns, the `top_k` most frequent
/// values (ties in first-seen order). Shares are relative to present values.
pub fn top_categories(table: &Table, max_columns: usize, top_k: usize) -> TopCategories {
    let tables = table
        .columns()
        .iter()
        .filter(|c| ColumnKind::classify(&c.values) == ColumnKind::Categorical)
        .take(max_columns)
        .map(|c| {
            let mut freq = FrequencyCounter::new();
            c.present().for_each(|v| freq.add_value(v));
            (c.name.clone(), freq.top_n(top_k))
        })
        .collect();
    TopCategories { tables }
}
