use crate::duplicates::count_duplicate_rows;
use crate::missing::{missing_table, MissingTable};
use crate::outliers::{detect_outliers, OutlierFlag};
use crate::summary::{summarize_dataset, DatasetSummary};
use crate::table::Table;
use eda_common::{check_quality_bounds, EdaError, QualityConfig, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const MISSING_WEIGHT: f64 = 0.5;
const OUTLIER_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityParams {
    pub outlier_k: f64,
    pub missing_share_threshold: f64,
    pub min_rows: usize,
}

impl Default for QualityParams {
    fn default() -> Self {
        QualityConfig::default().into()
    }
}

impl From<QualityConfig> for QualityParams {
    fn from(cfg: QualityConfig) -> Self {
        Self {
            outlier_k: cfg.outlier_k,
            missing_share_threshold: cfg.missing_share_threshold,
            min_rows: cfg.min_rows,
        }
    }
}

impl QualityParams {
    pub fn new(outlier_k: f64, missing_share_threshold: f64) -> Self {
        Self {
            outlier_k,
            missing_share_threshold,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_quality_bounds(self.outlier_k, self.missing_share_threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityFlags {
    /// Columns whose missing share exceeds the threshold, table order.
    pub how_many_empties: Vec<String>,
    pub too_many_missing: bool,
    pub may_have_outliers: Vec<OutlierFlag>,
    pub quality_score: f64,
    pub overall_missing_share: f64,
    pub max_missing_share: f64,
    pub outlier_density: f64,
    pub constant_columns: Vec<String>,
    pub too_few_rows: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_rows: Option<usize>,
}

/// Weighted blend of completeness and outlier-free share, in [0, 1].
pub fn quality_score(overall_missing_share: f64, outlier_density: f64) -> f64 {
    let score = MISSING_WEIGHT * (1.0 - overall_missing_share.clamp(0.0, 1.0))
        + OUTLIER_WEIGHT * (1.0 - outlier_density.clamp(0.0, 1.0));
    score.clamp(0.0, 1.0)
}

fn check_same_columns(summary: &DatasetSummary, missing: &MissingTable) -> Result<()> {
    let from_summary: HashSet<&str> = summary.columns.iter().map(|c| c.name.as_str()).collect();
    let from_missing: HashSet<&str> = missing.column_names().into_iter().collect();
    if summary.columns.len() != missing.len() || from_summary != from_missing {
        let mut only_summary: Vec<&str> = from_summary.difference(&from_missing).copied().collect();
        let mut only_missing: Vec<&str> = from_missing.difference(&from_summary).copied().collect();
        only_summary.sort_unstable();
        only_missing.sort_unstable();
        return Err(EdaError::validation(format!(
            "summary and missing table disagree on columns (summary only: {only_summary:?}, missing table only: {only_missing:?})"
        )));
    }
    if summary.n_rows != missing.n_rows() {
        return Err(EdaError::validation(format!(
            "summary has {} rows but missing table was built from {}",
            summary.n_rows,
            missing.n_rows()
        )));
    }
    Ok(())
}

pub fn compute_quality_flags(
    summary: &DatasetSummary,
    missing: &MissingTable,
    params: &QualityParams,
) -> Result<QualityFlags> {
    params.validate()?;
    check_same_columns(summary, missing)?;

    let threshold = params.missing_share_threshold;
    let how_many_empties: Vec<String> = summary
        .columns
        .iter()
        .filter(|c| missing.get(&c.name).is_some_and(|e| e.missing_share > threshold))
        .map(|c| c.name.clone())
        .collect();

    let overall_missing_share = missing.overall_share();
    let max_missing_share = missing.max_share();

    let mut may_have_outliers = Vec::new();
    let mut flagged_cells = 0usize;
    let mut numeric_cells = 0usize;
    for col in &summary.columns {
        let Some(num) = col.numeric() else { continue };
        if num.values().len() != col.count {
            return Err(EdaError::validation(format!(
                "numeric profile of '{}' holds {} of {} observed values (deserialized summaries carry none)",
                col.name,
                num.values().len(),
                col.count
            )));
        }
        numeric_cells += num.values().len();
        if let (Some(mean), Some(std)) = (num.mean, num.std) {
            let scan = detect_outliers(&col.name, num.values(), mean, std, params.outlier_k);
            flagged_cells += scan.flagged_cells;
            may_have_outliers.extend(scan.flags);
        }
    }
    let outlier_density = if numeric_cells == 0 {
        0.0
    } else {
        flagged_cells as f64 / numeric_cells as f64
    };

    let constant_columns = if summary.n_rows == 0 {
        Vec::new()
    } else {
        summary
            .columns
            .iter()
            .filter(|c| c.distinct_count <= 1)
            .map(|c| c.name.clone())
            .collect()
    };

    let flags = QualityFlags {
        too_many_missing: max_missing_share > threshold,
        quality_score: quality_score(overall_missing_share, outlier_density),
        how_many_empties,
        may_have_outliers,
        overall_missing_share,
        max_missing_share,
        outlier_density,
        constant_columns,
        too_few_rows: summary.n_rows < params.min_rows,
        duplicate_rows: None,
    };
    tracing::debug!(
        score = flags.quality_score,
        outliers = flags.may_have_outliers.len(),
        empties = flags.how_many_empties.len(),
        "computed quality flags"
    );
    Ok(flags)
}

/// Summarizes, measures missingness and adds the row-level duplicate count.
pub fn compute_quality_flags_for_table(table: &Table, params: &QualityParams) -> Result<QualityFlags> {
    let summary = summarize_dataset(table);
    let missing = missing_table(table);
    let mut flags = compute_quality_flags(&summary, &missing, params)?;
    flags.duplicate_rows = Some(count_duplicate_rows(table));
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outliers::Direction;
    use crate::table::{Column, Value};

    fn params() -> QualityParams {
        QualityParams::new(2.5, 0.3)
    }

    fn flags_for(table: &Table) -> QualityFlags {
        compute_quality_flags(&summarize_dataset(table), &missing_table(table), &params()).unwrap()
    }

    fn nums(xs: &[f64]) -> Vec<Value> {
        xs.iter().map(|&x| Value::Number(x)).collect()
    }

    #[test]
    fn clean_table_scores_one() {
        let t = Table::new(vec![Column::new("a", nums(&[1.0, 2.0, 3.0, 4.0]))]).unwrap();
        let f = flags_for(&t);
        assert_eq!(f.quality_score, 1.0);
        assert!(f.how_many_empties.is_empty());
        assert!(!f.too_many_missing);
        assert!(f.may_have_outliers.is_empty());
    }

    #[test]
    fn empty_table_is_well_defined() {
        let f = flags_for(&Table::default());
        assert_eq!(f.quality_score, 1.0);
        assert_eq!(f.overall_missing_share, 0.0);
        assert!(f.constant_columns.is_empty());
        assert!(f.too_few_rows);
    }

    #[test]
    fn missingness_lowers_score_monotonically() {
        let mut last = f64::INFINITY;
        for missing in 0..=4 {
            let vals: Vec<Value> = (0..4)
                .map(|i| if i < missing { Value::Missing } else { "x".into() })
                .collect();
            let t = Table::new(vec![Column::new("c", vals)]).unwrap();
            let score = flags_for(&t).quality_score;
            assert!(score < last, "missing={missing} score={score} last={last}");
            last = score;
        }
    }

    #[test]
    fn outliers_lower_score() {
        let mut vals = vec![10.0; 20];
        vals.push(1000.0);
        let t = Table::new(vec![Column::new("v", nums(&vals))]).unwrap();
        let f = flags_for(&t);
        assert_eq!(f.may_have_outliers.len(), 1);
        assert_eq!(f.may_have_outliers[0].direction, Direction::TooBig);
        assert!(f.quality_score < 1.0);
        assert!((f.outlier_density - 1.0 / 21.0).abs() < 1e-12);
    }

    #[test]
    fn threshold_is_strict() {
        // 3/10 missing equals the threshold, so it is not flagged
        let vals: Vec<Value> = (0..10)
            .map(|i| if i < 3 { Value::Missing } else { Value::Number(i as f64) })
            .collect();
        let t = Table::new(vec![Column::new("a", vals)]).unwrap();
        let f = flags_for(&t);
        assert!(f.how_many_empties.is_empty());
        assert!(!f.too_many_missing);
    }

    #[test]
    fn mismatched_columns_rejected() {
        let a = Table::new(vec![Column::new("a", nums(&[1.0]))]).unwrap();
        let b = Table::new(vec![Column::new("b", nums(&[1.0]))]).unwrap();
        let err = compute_quality_flags(&summarize_dataset(&a), &missing_table(&b), &params()).unwrap_err();
        assert!(matches!(err, EdaError::Validation(_)));
        assert!(err.to_string().contains("\"a\""));
    }

    #[test]
    fn mismatched_row_counts_rejected() {
        let a = Table::new(vec![Column::new("a", nums(&[1.0]))]).unwrap();
        let b = Table::new(vec![Column::new("a", nums(&[1.0, 2.0]))]).unwrap();
        assert!(compute_quality_flags(&summarize_dataset(&a), &missing_table(&b), &params()).is_err());
    }

    #[test]
    fn invalid_params_rejected() {
        let t = Table::default();
        let (s, m) = (summarize_dataset(&t), missing_table(&t));
        assert!(compute_quality_flags(&s, &m, &QualityParams::new(-1.0, 0.3)).is_err());
        assert!(compute_quality_flags(&s, &m, &QualityParams::new(2.5, 1.2)).is_err());
        assert!(compute_quality_flags(&s, &m, &QualityParams::new(f64::NAN, 0.3)).is_err());
    }

    #[test]
    fn constant_columns_listed() {
        let t = Table::new(vec![
            Column::new("same", vec!["Moscow".into(); 3]),
            Column::new("varies", nums(&[1.0, 2.0, 3.0])),
        ])
        .unwrap();
        assert_eq!(flags_for(&t).constant_columns, vec!["same"]);
    }

    #[test]
    fn deserialized_summary_without_values_rejected() {
        let mut vals = vec![10.0; 20];
        vals.push(1000.0);
        let t = Table::new(vec![Column::new("v", nums(&vals))]).unwrap();
        let json = serde_json::to_string(&summarize_dataset(&t)).unwrap();
        let restored: DatasetSummary = serde_json::from_str(&json).unwrap();
        let err = compute_quality_flags(&restored, &missing_table(&t), &params()).unwrap_err();
        assert!(matches!(err, EdaError::Validation(_)), "{err}");
    }

    #[test]
    fn all_missing_numeric_column_is_accepted() {
        let t = Table::new(vec![Column::new("gone", vec![Value::Missing; 3])]).unwrap();
        let f = flags_for(&t);
        assert_eq!(f.outlier_density, 0.0);
    }

    #[test]
    fn table_variant_counts_duplicates() {
        let t = Table::new(vec![Column::new("a", nums(&[1.0, 1.0, 2.0]))]).unwrap();
        let f = compute_quality_flags_for_table(&t, &params()).unwrap();
        assert_eq!(f.duplicate_rows, Some(1));
    }

    #[test]
    fn score_formula_bounds() {
        assert_eq!(quality_score(0.0, 0.0), 1.0);
        assert_eq!(quality_score(1.0, 1.0), 0.0);
        assert!(quality_score(0.1, 0.0) > quality_score(0.2, 0.0));
        assert!(quality_score(0.0, 0.1) < 1.0);
    }
}
