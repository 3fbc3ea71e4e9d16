use crate::profile::{profile_column, ColumnProfile};
use crate::table::Table;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub n_rows: usize,
    pub n_cols: usize,
    pub columns: Vec<ColumnProfile>,
}

impl DatasetSummary {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }
}

pub fn summarize_dataset(table: &Table) -> DatasetSummary {
    summarize_dataset_with(table, None)
}

/// Profiles every column in table order; `top_k` is forwarded to the
/// categorical profiler.
pub fn summarize_dataset_with(table: &Table, top_k: Option<usize>) -> DatasetSummary {
    let columns: Vec<ColumnProfile> = table
        .columns()
        .iter()
        .map(|c| profile_column(c, top_k))
        .collect();
    tracing::debug!(rows = table.n_rows(), cols = columns.len(), "summarized dataset");
    DatasetSummary {
        n_rows: table.n_rows(),
        n_cols: table.n_cols(),
        columns,
    }
}

/// One printable row per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub name: String,
    pub kind: String,
    pub count: usize,
    pub missing_count: usize,
    pub missing_share: f64,
    pub distinct_count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub fn flatten_summary(summary: &DatasetSummary) -> Vec<SummaryRow> {
    summary
        .columns
        .iter()
        .map(|c| {
            let num = c.numeric();
            SummaryRow {
                name: c.name.clone(),
                kind: c.kind().as_str().to_owned(),
                count: c.count,
                missing_count: c.missing_count,
                missing_share: c.missing_share,
                distinct_count: c.distinct_count,
                mean: num.and_then(|n| n.mean),
                std: num.and_then(|n| n.std),
                min: num.and_then(|n| n.min),
                max: num.and_then(|n| n.max),
            }
        })
        .collect()
}
