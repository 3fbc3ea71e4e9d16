use crate::profile::ColumnKind;
use crate::table::{Column, Table};
use serde::{Deserialize, Serialize};

/// Symmetric Pearson matrix over the numeric columns. `values[i][j]` is
/// `None` where the coefficient is undefined.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Pearson r over paired observations; `None` with fewer than two pairs or
/// zero variance on either side.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

fn paired(a: &Column, b: &Column) -> Vec<(f64, f64)> {
    a.values
        .iter()
        .zip(&b.values)
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .collect()
}

/// Empty when the table has fewer than two numeric columns.
pub fn correlation_matrix(table: &Table) -> CorrelationMatrix {
    let numeric: Vec<&Column> = table
        .columns()
        .iter()
        .filter(|c| ColumnKind::classify(&c.values) == ColumnKind::Numeric)
        .collect();
    if numeric.len() < 2 {
        return CorrelationMatrix::default();
    }
    let n = numeric.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        let own = paired(numeric[i], numeric[i]);
        values[i][i] = pearson(&own).map(|_| 1.0);
        for j in (i + 1)..n {
            let r = pearson(&paired(numeric[i], numeric[j]));
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name.clone()).collect(),
        values,
    }
}
