use crate::table::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: u64,
    pub share: f64,
}

/// Counting key that keeps `Number(1.0)`, `Text("1")` and `Bool` apart.
fn cell_key(v: &Value) -> String {
    match v {
        Value::Missing => "m".into(),
        Value::Number(x) => format!("n{:016x}", (x + 0.0).to_bits()),
        Value::Bool(b) => format!("b{b}"),
        Value::Text(s) => format!("t{s}"),
    }
}

/// Counts values while remembering first-seen order.
pub struct FrequencyCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
    total: u64,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
            total: 0,
        }
    }

    /// Counts a cell by kind and value; entries are labelled by its display form.
    pub fn add_value(&mut self, val: &Value) {
        self.add_keyed(cell_key(val), val.to_string());
    }

    fn add_keyed(&mut self, key: String, label: String) {
        self.total += 1;
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((label, 1));
            }
        }
    }

    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// First `n` distinct values in first-seen order.
    pub fn first_seen(&self, n: usize) -> Vec<String> {
        self.entries.iter().take(n).map(|(v, _)| v.clone()).collect()
    }

    /// Most frequent values; equal counts keep first-seen order.
    pub fn top_n(&self, n: usize) -> Vec<FrequencyEntry> {
        let total = self.total;
        let mut ranked: Vec<&(String, u64)> = self.entries.iter().collect();
        // stable sort: ties stay in insertion order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(n)
            .map(|(v, c)| FrequencyEntry {
                value: v.clone(),
                count: *c,
                share: if total > 0 {
                    *c as f64 / total as f64
                } else {
                    0.0
                },
            })
            .collect()
    }
}

impl Default for FrequencyCounter {
    fn default() -> Self {
        Self::new()
    }
}
