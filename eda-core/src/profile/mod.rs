pub mod frequency;
pub mod numeric;

pub use frequency::{FrequencyCounter, FrequencyEntry};
pub use numeric::{NumericAccumulator, NumericProfile};

use crate::table::{Column, Value};
use serde::{Deserialize, Serialize};

const EXAMPLE_VALUES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Other,
}

impl ColumnKind {
    /// numeric: every present value is a number (vacuously true when none are);
    /// other: every present value is a boolean; categorical otherwise.
    pub fn classify(values: &[Value]) -> Self {
        let mut present = values.iter().filter(|v| !v.is_missing()).peekable();
        if present.peek().is_none() {
            return ColumnKind::Numeric;
        }
        let (mut numbers, mut bools, mut total) = (0usize, 0usize, 0usize);
        for v in present {
            total += 1;
            match v {
                Value::Number(_) => numbers += 1,
                Value::Bool(_) => bools += 1,
                _ => {}
            }
        }
        if numbers == total {
            ColumnKind::Numeric
        } else if bools == total {
            ColumnKind::Other
        } else {
            ColumnKind::Categorical
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoricalProfile {
    #[serde(default)]
    pub top_values: Vec<FrequencyEntry>,
}

/// Kind-specific part of a profile, decided once when the column is profiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnStats {
    Numeric(NumericProfile),
    Categorical(CategoricalProfile),
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub count: usize,
    pub missing_count: usize,
    pub missing_share: f64,
    pub distinct_count: usize,
    pub example_values: Vec<String>,
    #[serde(flatten)]
    pub stats: ColumnStats,
}

impl ColumnProfile {
    pub fn kind(&self) -> ColumnKind {
        match self.stats {
            ColumnStats::Numeric(_) => ColumnKind::Numeric,
            ColumnStats::Categorical(_) => ColumnKind::Categorical,
            ColumnStats::Other => ColumnKind::Other,
        }
    }

    pub fn numeric(&self) -> Option<&NumericProfile> {
        match &self.stats {
            ColumnStats::Numeric(p) => Some(p),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.count + self.missing_count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Profiles one column. `top_k` requests the most frequent values of a
/// categorical column.
pub fn profile_column(column: &Column, top_k: Option<usize>) -> ColumnProfile {
    let kind = ColumnKind::classify(&column.values);
    let mut freq = FrequencyCounter::new();
    let mut numeric = (kind == ColumnKind::Numeric).then(NumericAccumulator::new);
    for v in column.present() {
        freq.add_value(v);
        if let (Some(acc), Value::Number(x)) = (numeric.as_mut(), v) {
            acc.add(*x);
        }
    }
    let count = freq.total() as usize;
    let missing_count = column.len() - count;
    let stats = match kind {
        ColumnKind::Numeric => ColumnStats::Numeric(numeric.unwrap_or_default().finish()),
        ColumnKind::Categorical => ColumnStats::Categorical(CategoricalProfile {
            top_values: top_k.map(|k| freq.top_n(k)).unwrap_or_default(),
        }),
        ColumnKind::Other => ColumnStats::Other,
    };
    ColumnProfile {
        name: column.name.clone(),
        count,
        missing_count,
        missing_share: if column.is_empty() {
            0.0
        } else {
            missing_count as f64 / column.len() as f64
        },
        distinct_count: freq.distinct(),
        example_values: freq.first_seen(EXAMPLE_VALUES),
        stats,
    }
}
