pub mod categories;
pub mod correlation;
pub mod duplicates;
pub mod export;
pub mod ingest;
pub mod missing;
pub mod outliers;
pub mod preview;
pub mod profile;
pub mod quality;
pub mod service;
pub mod summary;
pub mod table;

pub use eda_common::{EdaError, Result};

pub use categories::{top_categories, TopCategories};
pub use correlation::{correlation_matrix, pearson, CorrelationMatrix};
pub use duplicates::count_duplicate_rows;
pub use export::{write_markdown, write_report, ReportOptions};
pub use ingest::{load_path, parse_bytes, parse_cell, Format};
pub use missing::{missing_table, MissingEntry, MissingTable};
pub use outliers::{detect_outliers, Direction, OutlierFlag, OutlierScan};
pub use preview::{head, missingness_matrix, records, sample, MissingnessMatrix, Preview};
pub use profile::{
    profile_column, CategoricalProfile, ColumnKind, ColumnProfile, ColumnStats, FrequencyEntry,
    NumericProfile,
};
pub use quality::{
    compute_quality_flags, compute_quality_flags_for_table, quality_score, QualityFlags,
    QualityParams,
};
pub use summary::{flatten_summary, summarize_dataset, summarize_dataset_with, DatasetSummary, SummaryRow};
pub use table::{Column, Table, Value};
