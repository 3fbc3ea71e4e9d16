//! Request-shaped payloads.
//!
//! Each function takes the raw upload plus its query parameters and returns
//! the JSON body the request layer sends back. [`respond`] turns a result
//! into a status code and body, rejections carrying `{"detail": ...}`.

use crate::correlation::correlation_matrix;
use crate::categories::top_categories;
use crate::ingest::{csv_input::parse_csv, json_input::table_from_columns};
use crate::missing::missing_table;
use crate::preview::{head, missingness_matrix, sample};
use crate::quality::{compute_quality_flags, compute_quality_flags_for_table, QualityParams};
use crate::summary::summarize_dataset;
use crate::table::Table;
use eda_common::Result;
use serde_json::{json, Map, Value as Json};

pub const SERVICE_NAME: &str = "eda-api";

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Json,
}

pub fn respond(result: Result<Json>) -> Response {
    match result {
        Ok(body) => Response { status: 200, body },
        Err(e) => {
            let status = e.status_code();
            if status >= 500 {
                tracing::error!(error = %e, "request failed");
            } else {
                tracing::warn!(error = %e, "request rejected");
            }
            Response {
                status,
                body: json!({ "detail": e.to_string() }),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryToggles {
    pub include_missing: bool,
    pub include_stats: bool,
    pub include_flags: bool,
}

impl Default for SummaryToggles {
    fn default() -> Self {
        Self {
            include_missing: true,
            include_stats: true,
            include_flags: true,
        }
    }
}

pub fn health() -> Json {
    json!({ "status": "ok", "service": SERVICE_NAME })
}

fn flags_body(table: &Table, params: &QualityParams) -> Result<Json> {
    let flags = compute_quality_flags_for_table(table, params)?;
    Ok(json!({ "flags": flags }))
}

/// Body is a JSON object mapping column names to equal-length arrays.
pub fn quality_from_columns(body: &Map<String, Json>, params: &QualityParams) -> Result<Json> {
    flags_body(&table_from_columns(body)?, params)
}

pub fn quality_from_csv(upload: &[u8], params: &QualityParams) -> Result<Json> {
    flags_body(&parse_csv(upload)?, params)
}

pub fn quality_flags_from_csv(upload: &[u8], params: &QualityParams) -> Result<Json> {
    quality_report(&parse_csv(upload)?, params)
}

/// Flags together with the summary and missing table they were derived from.
pub fn quality_report(table: &Table, params: &QualityParams) -> Result<Json> {
    let summary = summarize_dataset(table);
    let missing = missing_table(table);
    let flags = compute_quality_flags(&summary, &missing, params)?;
    Ok(json!({
        "flags": flags,
        "summary": summary,
        "missing_statistics": missing,
    }))
}

pub fn dataset_info(table: &Table) -> Json {
    let kinds: Map<String, Json> = summarize_dataset(table)
        .columns
        .iter()
        .map(|c| (c.name.clone(), Json::from(c.kind().as_str())))
        .collect();
    json!({
        "shape": [table.n_rows(), table.n_cols()],
        "columns": table.column_names(),
        "kinds": kinds,
    })
}

pub fn summary_from_csv(upload: &[u8], toggles: SummaryToggles, params: &QualityParams) -> Result<Json> {
    summary_body(&parse_csv(upload)?, toggles, params)
}

pub fn summary_body(table: &Table, toggles: SummaryToggles, params: &QualityParams) -> Result<Json> {
    let mut body = Map::new();
    body.insert("dataset_info".into(), dataset_info(table));
    if toggles.include_stats {
        body.insert("statistics".into(), serde_json::to_value(summarize_dataset(table))?);
    }
    if toggles.include_missing {
        body.insert("missing_data".into(), serde_json::to_value(missing_table(table))?);
    }
    if toggles.include_flags {
        let flags = compute_quality_flags_for_table(table, params)?;
        body.insert("quality_flags".into(), serde_json::to_value(flags)?);
    }
    Ok(Json::Object(body))
}

pub fn head_from_csv(upload: &[u8], n: i64) -> Result<Json> {
    let table = parse_csv(upload)?;
    Ok(serde_json::to_value(head(&table, n)?)?)
}

pub fn sample_from_csv(upload: &[u8], n: i64, random_state: u64) -> Result<Json> {
    let table = parse_csv(upload)?;
    Ok(serde_json::to_value(sample(&table, n, random_state)?)?)
}

pub fn missingness_heatmap_from_csv(upload: &[u8]) -> Result<Json> {
    Ok(heatmap_body(&parse_csv(upload)?))
}

pub fn heatmap_body(table: &Table) -> Json {
    let matrix = missingness_matrix(table);
    json!({
        "heatmap_data": { "columns": matrix.columns, "rows": matrix.rows },
        "shape": [table.n_rows(), table.n_cols()],
        "missing_percentage": matrix.missing_percentage,
    })
}

pub fn correlation_from_csv(upload: &[u8]) -> Result<Json> {
    let table = parse_csv(upload)?;
    Ok(json!({ "correlation": correlation_matrix(&table) }))
}

pub fn top_categories_from_csv(upload: &[u8], max_columns: usize, top_k: usize) -> Result<Json> {
    let table = parse_csv(upload)?;
    Ok(json!({ "top_categories": top_categories(&table, max_columns, top_k) }))
}
