use crate::table::Table;
use eda_common::{EdaError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::{Map, Value as Json};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub count: usize,
    pub total_rows: usize,
    pub requested_n: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_state: Option<u64>,
    pub data: Vec<Map<String, Json>>,
}

/// Rows as JSON records; missing cells become `null`.
pub fn records(table: &Table) -> Vec<Map<String, Json>> {
    (0..table.n_rows())
        .map(|row| {
            table
                .columns()
                .iter()
                .map(|c| (c.name.clone(), Json::from(&c.values[row])))
                .collect()
        })
        .collect()
}

fn positive(n: i64) -> Result<usize> {
    if n <= 0 {
        return Err(EdaError::validation(format!("n must be a positive number, got {n}")));
    }
    usize::try_from(n).map_err(|_| EdaError::validation(format!("n is too large: {n}")))
}

pub fn head(table: &Table, n: i64) -> Result<Preview> {
    let requested_n = positive(n)?;
    let take = requested_n.min(table.n_rows());
    let indices: Vec<usize> = (0..take).collect();
    let rows = table.take_rows(&indices)?;
    Ok(Preview {
        count: rows.n_rows(),
        total_rows: table.n_rows(),
        requested_n,
        random_state: None,
        data: records(&rows),
    })
}

/// Seeded sample without replacement. `n` is clamped to the row count and
/// the reported `requested_n` is the clamped value.
pub fn sample(table: &Table, n: i64, random_state: u64) -> Result<Preview> {
    let requested_n = positive(n)?.min(table.n_rows());
    let mut rng = StdRng::seed_from_u64(random_state);
    let indices = rand::seq::index::sample(&mut rng, table.n_rows(), requested_n).into_vec();
    let rows = table.take_rows(&indices)?;
    Ok(Preview {
        count: rows.n_rows(),
        total_rows: table.n_rows(),
        requested_n,
        random_state: Some(random_state),
        data: records(&rows),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingnessMatrix {
    pub columns: Vec<String>,
    /// `rows[r][c]` is true when the cell is missing.
    pub rows: Vec<Vec<bool>>,
    pub missing_percentage: f64,
}

pub fn missingness_matrix(table: &Table) -> MissingnessMatrix {
    let rows: Vec<Vec<bool>> = (0..table.n_rows())
        .map(|r| table.columns().iter().map(|c| c.values[r].is_missing()).collect())
        .collect();
    let missing: usize = table.columns().iter().map(|c| c.missing_count()).sum();
    let cells = table.n_cells();
    MissingnessMatrix {
        columns: table.column_names().into_iter().map(str::to_owned).collect(),
        rows,
        missing_percentage: if cells == 0 {
            0.0
        } else {
            missing as f64 / cells as f64 * 100.0
        },
    }
}
