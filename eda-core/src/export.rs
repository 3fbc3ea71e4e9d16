use crate::categories::{top_categories, TopCategories};
use crate::correlation::{correlation_matrix, CorrelationMatrix};
use crate::duplicates::count_duplicate_rows;
use crate::missing::{missing_table, MissingTable};
use crate::quality::{compute_quality_flags, QualityFlags, QualityParams};
use crate::summary::{flatten_summary, summarize_dataset, DatasetSummary};
use crate::table::Table;
use eda_common::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub top_k: usize,
    pub max_columns: usize,
}

fn file_stem(column: &str) -> String {
    let stem: String = column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "_".into()
    } else {
        stem
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".into(), |x| format!("{x:.4}"))
}

pub fn export_summary_csv(path: &Path, summary: &DatasetSummary) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;
    for row in flatten_summary(summary) {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_missing_csv(path: &Path, missing: &MissingTable) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record(["column", "missing_count", "missing_share"])?;
    for (name, entry) in missing.iter() {
        w.write_record([
            name.to_owned(),
            entry.missing_count.to_string(),
            entry.missing_share.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_correlation_csv(path: &Path, matrix: &CorrelationMatrix) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;
    let mut header = vec![String::new()];
    header.extend(matrix.columns.iter().cloned());
    w.write_record(&header)?;
    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        let mut record = vec![name.clone()];
        record.extend(row.iter().map(|v| v.map(|x| x.to_string()).unwrap_or_default()));
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}

/// One `<column>.csv` per categorical column under `dir`.
pub fn export_top_categories(dir: &Path, top: &TopCategories) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (name, entries) in top.iter() {
        let path = dir.join(format!("{}.csv", file_stem(name)));
        let mut w = csv::Writer::from_path(&path)?;
        for e in entries {
            w.serialize(e)?;
        }
        w.flush()?;
        written.push(path);
    }
    Ok(written)
}

pub fn write_markdown(
    out: &mut impl Write,
    summary: &DatasetSummary,
    flags: &QualityFlags,
    params: &QualityParams,
) -> Result<()> {
    writeln!(out, "# EDA report\n")?;
    writeln!(out, "Rows: **{}**, columns: **{}**\n", summary.n_rows, summary.n_cols)?;
    writeln!(out, "## Quality\n")?;
    writeln!(out, "- quality score: **{:.3}**", flags.quality_score)?;
    writeln!(
        out,
        "- missing cells: {:.2}% (worst column {:.2}%)",
        flags.overall_missing_share * 100.0,
        flags.max_missing_share * 100.0
    )?;
    writeln!(
        out,
        "- too many missing (> {:.0}%): {}",
        params.missing_share_threshold * 100.0,
        flags.too_many_missing
    )?;
    if !flags.how_many_empties.is_empty() {
        writeln!(out, "- mostly empty columns: {}", flags.how_many_empties.join(", "))?;
    }
    if !flags.constant_columns.is_empty() {
        writeln!(out, "- constant columns: {}", flags.constant_columns.join(", "))?;
    }
    if let Some(d) = flags.duplicate_rows {
        writeln!(out, "- duplicate rows: {d}")?;
    }
    if flags.too_few_rows {
        writeln!(out, "- fewer than {} rows", params.min_rows)?;
    }
    writeln!(out, "\n## Outliers (k = {})\n", params.outlier_k)?;
    if flags.may_have_outliers.is_empty() {
        writeln!(out, "None flagged.")?;
    } else {
        writeln!(out, "| column | value | direction |\n|---|---|---|")?;
        for f in &flags.may_have_outliers {
            writeln!(out, "| {} | {} | {} |", f.column, f.value, f.direction.as_str())?;
        }
    }
    writeln!(out, "\n## Columns\n")?;
    writeln!(out, "| name | kind | missing | distinct | mean | std | min | max |")?;
    writeln!(out, "|---|---|---|---|---|---|---|---|")?;
    for r in flatten_summary(summary) {
        writeln!(
            out,
            "| {} | {} | {:.1}% | {} | {} | {} | {} | {} |",
            r.name,
            r.kind,
            r.missing_share * 100.0,
            r.distinct_count,
            fmt_opt(r.mean),
            fmt_opt(r.std),
            fmt_opt(r.min),
            fmt_opt(r.max),
        )?;
    }
    Ok(())
}

/// Writes the full report set into `out_dir` and returns the written paths.
pub fn write_report(
    out_dir: &Path,
    table: &Table,
    params: &QualityParams,
    opts: ReportOptions,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    let summary = summarize_dataset(table);
    let missing = missing_table(table);
    let mut flags = compute_quality_flags(&summary, &missing, params)?;
    flags.duplicate_rows = Some(count_duplicate_rows(table));

    let mut written = Vec::new();
    let path = out_dir.join("summary.csv");
    export_summary_csv(&path, &summary)?;
    written.push(path);

    let path = out_dir.join("missing.csv");
    export_missing_csv(&path, &missing)?;
    written.push(path);

    let path = out_dir.join("correlation.csv");
    export_correlation_csv(&path, &correlation_matrix(table))?;
    written.push(path);

    let top = top_categories(table, opts.max_columns, opts.top_k);
    written.extend(export_top_categories(&out_dir.join("top_categories"), &top)?);

    let path = out_dir.join("quality_flags.json");
    let file = std::fs::File::create(&path)?;
    serde_json::to_writer_pretty(file, &flags)?;
    written.push(path);

    let path = out_dir.join("report.md");
    let mut file = std::fs::File::create(&path)?;
    write_markdown(&mut file, &summary, &flags, params)?;
    written.push(path);

    tracing::info!(dir = %out_dir.display(), files = written.len(), "report written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, Value};

    fn table() -> Table {
        Table::new(vec![
            Column::new("age", vec![10.0.into(), 20.0.into(), 30.0.into(), Value::Missing]),
            Column::new("height", vec![140.0.into(), 150.0.into(), 160.0.into(), 170.0.into()]),
            Column::new("home city", vec!["A".into(), "B".into(), "A".into(), Value::Missing]),
        ])
        .unwrap()
    }

    #[test]
    fn stems_are_filesystem_safe() {
        assert_eq!(file_stem("home city"), "home_city");
        assert_eq!(file_stem("a/b"), "a_b");
        assert_eq!(file_stem(""), "_");
    }

    #[test]
    fn report_set_written() {
        let dir = tempfile::tempdir().unwrap();
        let opts = ReportOptions { top_k: 2, max_columns: 5 };
        let paths = write_report(dir.path(), &table(), &QualityParams::default(), opts).unwrap();
        for p in &paths {
            assert!(p.exists(), "{}", p.display());
        }
        assert!(dir.path().join("top_categories").join("home_city.csv").exists());
        let md = std::fs::read_to_string(dir.path().join("report.md")).unwrap();
        assert!(md.contains("Rows: **4**, columns: **3**"));
        let missing = std::fs::read_to_string(dir.path().join("missing.csv")).unwrap();
        assert!(missing.starts_with("column,missing_count,missing_share\nage,1,0.25\n"), "{missing}");
    }

    #[test]
    fn summary_csv_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.csv");
        export_summary_csv(&path, &summarize_dataset(&table())).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "name,kind,count,missing_count,missing_share,distinct_count,mean,std,min,max"
        );
    }

    #[test]
    fn markdown_lists_outliers() {
        let mut vals: Vec<Value> = vec![Value::Number(10.0); 20];
        vals.push(Value::Number(1000.0));
        let t = Table::new(vec![Column::new("v", vals)]).unwrap();
        let summary = summarize_dataset(&t);
        let params = QualityParams::default();
        let flags = compute_quality_flags(&summary, &missing_table(&t), &params).unwrap();
        let mut buf = Vec::new();
        write_markdown(&mut buf, &summary, &flags, &params).unwrap();
        let md = String::from_utf8(buf).unwrap();
        assert!(md.contains("| v | 1000 | toobig |"), "{md}");
    }
}
