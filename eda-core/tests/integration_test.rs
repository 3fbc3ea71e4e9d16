use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use eda_core::{
    compute_quality_flags, correlation_matrix, flatten_summary, load_path, missing_table,
    summarize_dataset, top_categories, ColumnKind, Direction, QualityParams, Value,
};
use parquet::arrow::ArrowWriter;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const SAMPLE_CSV: &str = "age,height,city\n10,140,A\n20,150,B\n30,160,A\n,170,\n";

const OUTLIER_CSV: &str = "\
age,salary,score,height,department,experience,sex,city
25,50000,75,170,IT,2,,Moscow
30,55000,80,175,HR,5,,Moscow
35,60000,85,180,IT,3,,Moscow
28,52000,78,172,Sales,1,,Moscow
32,58000,82,178,HR,4,m,Moscow
150,1000000,95,250,IT,50,f,Moscow
29,53000,77,171,Sales,2,,Moscow
31,56000,81,176,IT,3,,Moscow
200,1200000,200,300,HR,60,,Moscow
27,51000,76,169,Sales,1,,Moscow
";

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    tmp.write_all(content.as_bytes()).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn write_parquet_fixture() -> NamedTempFile {
    let tmp = tempfile::Builder::new()
        .suffix(".parquet")
        .tempfile()
        .unwrap();
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("weight", DataType::Float64, true),
    ]));
    let ids = Arc::new(Int32Array::from(vec![1, 2, 3]));
    let names = Arc::new(StringArray::from(vec![Some("alice"), Some("bob"), None]));
    let weights = Arc::new(Float64Array::from(vec![Some(60.5), None, Some(f64::NAN)]));
    let batch = RecordBatch::try_new(schema.clone(), vec![ids, names, weights]).unwrap();
    let mut writer = ArrowWriter::try_new(tmp.as_file(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    tmp
}

#[test]
fn outlier_scenario_matches_expected_flags() {
    let tmp = write_temp(".csv", OUTLIER_CSV);
    let table = load_path(tmp.path()).unwrap();
    let summary = summarize_dataset(&table);
    let missing = missing_table(&table);
    let flags = compute_quality_flags(&summary, &missing, &QualityParams::new(2.5, 0.3)).unwrap();

    assert_eq!(flags.how_many_empties, vec!["sex"]);
    assert!(flags.too_many_missing);
    assert_eq!(flags.may_have_outliers.len(), 1);
    let only = &flags.may_have_outliers[0];
    assert_eq!((only.column.as_str(), only.value, only.direction), ("score", 200.0, Direction::TooBig));
    assert_eq!(flags.constant_columns, vec!["city"]);
    assert!(flags.quality_score < 1.0);
}

#[test]
fn outlier_scenario_serializes_like_the_api() {
    let tmp = write_temp(".csv", OUTLIER_CSV);
    let table = load_path(tmp.path()).unwrap();
    let flags = compute_quality_flags(
        &summarize_dataset(&table),
        &missing_table(&table),
        &QualityParams::default(),
    )
    .unwrap();
    let json = serde_json::to_value(&flags).unwrap();
    assert_eq!(json["how_many_empties"], serde_json::json!(["sex"]));
    assert_eq!(json["too_many_missing"], serde_json::json!(true));
    assert_eq!(json["may_have_outliers"], serde_json::json!([["score", 200.0, "toobig"]]));
}

#[test]
fn sample_table_summary_and_missing() {
    let tmp = write_temp(".csv", SAMPLE_CSV);
    let table = load_path(tmp.path()).unwrap();
    let summary = summarize_dataset(&table);
    assert_eq!((summary.n_rows, summary.n_cols), (4, 3));
    assert!(summary.columns.iter().any(|c| c.name == "age"));
    assert!(summary.columns.iter().any(|c| c.name == "city"));
    for c in &summary.columns {
        assert_eq!(c.count + c.missing_count, summary.n_rows);
    }

    let rows = flatten_summary(&summary);
    assert_eq!(rows[0].name, "age");
    assert_eq!(rows[0].missing_share, 0.25);

    let missing = missing_table(&table);
    assert_eq!(missing.get("age").unwrap().missing_count, 1);
    let flags = compute_quality_flags(&summary, &missing, &QualityParams::new(2.5, 0.3)).unwrap();
    assert!((0.0..=1.0).contains(&flags.quality_score));
}

#[test]
fn correlation_and_top_categories() {
    let tmp = write_temp(".csv", SAMPLE_CSV);
    let table = load_path(tmp.path()).unwrap();
    let corr = correlation_matrix(&table);
    assert!(corr.columns.contains(&"age".to_owned()));
    assert_eq!(corr.get("age", "age"), Some(1.0));
    assert_eq!(corr.get("age", "height"), corr.get("height", "age"));

    let top = top_categories(&table, 5, 2);
    let city = top.get("city").unwrap();
    assert!(city.len() <= 2);
    assert_eq!(city[0].value, "A");
}

#[test]
fn json_records_file() {
    let tmp = write_temp(
        ".json",
        r#"[{"age": 10, "city": "A"}, {"age": null, "city": "B"}, {"city": "A"}]"#,
    );
    let table = load_path(tmp.path()).unwrap();
    let missing = missing_table(&table);
    assert_eq!(missing.get("age").unwrap().missing_count, 2);
    assert_eq!(summarize_dataset(&table).columns[1].kind(), ColumnKind::Categorical);
}

#[test]
fn parquet_file_round_trips_into_table() {
    let tmp = write_parquet_fixture();
    let table = load_path(tmp.path()).unwrap();
    assert_eq!(table.column_names(), vec!["id", "name", "weight"]);
    assert_eq!(table.column("id").unwrap().values[2], Value::Number(3.0));
    assert_eq!(table.column("name").unwrap().values[2], Value::Missing);
    // NaN floats count as missing
    assert_eq!(table.column("weight").unwrap().missing_count(), 2);
    let summary = summarize_dataset(&table);
    assert_eq!(summary.column("id").unwrap().kind(), ColumnKind::Numeric);
}

#[test]
fn all_missing_column_share_is_one() {
    let tmp = write_temp(".csv", "a,b\n,1\n,2\n");
    let table = load_path(tmp.path()).unwrap();
    let missing = missing_table(&table);
    assert_eq!(missing.get("a").unwrap().missing_share, 1.0);
    assert_eq!(missing.get("b").unwrap().missing_share, 0.0);
    let profile = summarize_dataset(&table).columns[0].clone();
    assert_eq!(profile.distinct_count, 0);
    assert!(profile.numeric().unwrap().mean.is_none());
}
