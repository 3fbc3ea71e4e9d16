use serde::{Deserialize, Serialize};

/// Descriptive statistics over the non-missing values of a numeric column.
///
/// `std` is the sample standard deviation (n-1 denominator). Every field is
/// `None` when it is undefined for the observed count.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumericProfile {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    #[serde(skip)]
    values: Vec<f64>,
}

impl NumericProfile {
    /// Observed values in table order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Linear interpolation between closest ranks, `pos = q * (n - 1)`.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub struct NumericAccumulator {
    sum: f64,
    min: f64,
    max: f64,
    values: Vec<f64>,
}

impl NumericAccumulator {
    pub fn new() -> Self {
        Self {
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            values: Vec::new(),
        }
    }

    pub fn add(&mut self, v: f64) {
        self.values.push(v);
        self.sum += v;
        if v < self.min {
            self.min = v;
        }
        if v > self.max {
            self.max = v;
        }
    }

    pub fn finish(self) -> NumericProfile {
        let n = self.values.len();
        if n == 0 {
            return NumericProfile::default();
        }
        let mean = self.sum / n as f64;
        // second pass over the values
        let std = (n > 1).then(|| {
            let ss: f64 = self.values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        NumericProfile {
            mean: Some(mean),
            std,
            min: Some(self.min),
            max: Some(self.max),
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.50),
            q75: quantile(&sorted, 0.75),
            values: self.values,
        }
    }
}

impl Default for NumericAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
