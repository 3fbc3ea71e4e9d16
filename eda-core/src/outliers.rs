use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "toobig")]
    TooBig,
    #[serde(rename = "toosmall")]
    TooSmall,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TooBig => "toobig",
            Direction::TooSmall => "toosmall",
        }
    }
}

/// Serialized as a `[column, value, direction]` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f64, Direction)", into = "(String, f64, Direction)")]
pub struct OutlierFlag {
    pub column: String,
    pub value: f64,
    pub direction: Direction,
}

impl From<(String, f64, Direction)> for OutlierFlag {
    fn from((column, value, direction): (String, f64, Direction)) -> Self {
        Self {
            column,
            value,
            direction,
        }
    }
}

impl From<OutlierFlag> for (String, f64, Direction) {
    fn from(f: OutlierFlag) -> Self {
        (f.column, f.value, f.direction)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutlierScan {
    /// One entry per distinct offending value, first-seen order.
    pub flags: Vec<OutlierFlag>,
    /// Offending cells, counting repeats.
    pub flagged_cells: usize,
}

/// Flags values outside `mean ± k·std`. Columns with `std <= 0` yield nothing.
pub fn detect_outliers(column: &str, values: &[f64], mean: f64, std: f64, k: f64) -> OutlierScan {
    let mut scan = OutlierScan::default();
    if std.is_nan() || std <= 0.0 {
        return scan;
    }
    let upper = mean + k * std;
    let lower = mean - k * std;
    let mut seen: HashSet<u64> = HashSet::new();
    for &v in values {
        let direction = if v > upper {
            Direction::TooBig
        } else if v < lower {
            Direction::TooSmall
        } else {
            continue;
        };
        scan.flagged_cells += 1;
        // +0.0 so that -0.0 and 0.0 count as one value
        if seen.insert((v + 0.0).to_bits()) {
            scan.flags.push(OutlierFlag {
                column: column.to_owned(),
                value: v,
                direction,
            });
        }
    }
    scan
}
