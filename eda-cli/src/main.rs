use clap::{ArgAction, Parser, Subcommand};
use eda_common::{logging::init_logging, Config};
use eda_core::service::{self, SummaryToggles};
use eda_core::{
    compute_quality_flags_for_table, correlation_matrix, flatten_summary, head, load_path, sample,
    summarize_dataset, top_categories, write_report, QualityParams, ReportOptions, Table,
};
use serde_json::json;
use std::path::{Path, PathBuf};

fn parse_share(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("not a float: {s}"))?;
    if (0.0..=1.0).contains(&v) { Ok(v) } else { Err(format!("threshold must be in [0.0, 1.0], got {v}")) }
}

#[derive(Parser)]
#[command(name = "eda-cli", version, about = "Exploratory profiling for CSV, JSON and Parquet tables")]
struct Cli {
    /// -v for debug, -vv for trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[arg(short, long, global = true)]
    quiet: bool,
    #[arg(long, global = true)]
    outlier_k: Option<f64>,
    #[arg(long, global = true, value_parser = parse_share)]
    missing_threshold: Option<f64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-column overview table
    Overview { path: PathBuf },
    Summary {
        path: PathBuf,
        #[arg(long)] no_stats: bool,
        #[arg(long)] no_missing: bool,
        #[arg(long)] no_flags: bool,
    },
    Quality { path: PathBuf },
    Head {
        path: PathBuf,
        #[arg(short, allow_negative_numbers = true)] n: Option<i64>,
    },
    Sample {
        path: PathBuf,
        #[arg(short, allow_negative_numbers = true)] n: Option<i64>,
        #[arg(long)] random_state: Option<u64>,
    },
    Correlation { path: PathBuf },
    TopCategories {
        path: PathBuf,
        #[arg(long)] top_k: Option<usize>,
        #[arg(long)] max_columns: Option<usize>,
    },
    Missingness { path: PathBuf },
    Report {
        path: PathBuf,
        #[arg(long)] out_dir: Option<PathBuf>,
    },
    Health,
    /// Write the default config file
    InitConfig {
        #[arg(long)] force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;
    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config");
        Config::default()
    });
    if let Some(k) = cli.outlier_k { config.quality.outlier_k = k; }
    if let Some(t) = cli.missing_threshold { config.quality.missing_share_threshold = t; }
    let params = QualityParams::from(config.quality.clone());
    params.validate()?;

    match cli.command {
        Commands::Overview { path } => run_overview(&path, &params)?,
        Commands::Summary { path, no_stats, no_missing, no_flags } => {
            let toggles = SummaryToggles {
                include_missing: !no_missing,
                include_stats: !no_stats,
                include_flags: !no_flags,
            };
            print_json(&service::summary_body(&load(&path)?, toggles, &params)?)?
        }
        Commands::Quality { path } => print_json(&service::quality_report(&load(&path)?, &params)?)?,
        Commands::Head { path, n } => {
            let n = n.unwrap_or(config.report.preview_rows as i64);
            print_json(&serde_json::to_value(head(&load(&path)?, n)?)?)?
        }
        Commands::Sample { path, n, random_state } => {
            let n = n.unwrap_or(config.sample.n as i64);
            let seed = random_state.unwrap_or(config.sample.random_state);
            print_json(&serde_json::to_value(sample(&load(&path)?, n, seed)?)?)?
        }
        Commands::Correlation { path } => {
            print_json(&json!({ "correlation": correlation_matrix(&load(&path)?) }))?
        }
        Commands::TopCategories { path, top_k, max_columns } => {
            let top = top_categories(
                &load(&path)?,
                max_columns.unwrap_or(config.report.max_columns),
                top_k.unwrap_or(config.report.top_k),
            );
            print_json(&json!({ "top_categories": top }))?
        }
        Commands::Missingness { path } => print_json(&service::heatmap_body(&load(&path)?))?,
        Commands::Report { path, out_dir } => {
            let out_dir = out_dir.unwrap_or_else(|| PathBuf::from(&config.export.output_dir));
            let opts = ReportOptions { top_k: config.report.top_k, max_columns: config.report.max_columns };
            let written = write_report(&out_dir, &load(&path)?, &params, opts)?;
            for p in written {
                println!("{}", p.display());
            }
        }
        Commands::Health => print_json(&service::health())?,
        Commands::InitConfig { force } => run_init_config(force)?,
    }
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Table> {
    let table = load_path(path)?;
    tracing::info!(path = %path.display(), rows = table.n_rows(), cols = table.n_cols(), "loaded table");
    Ok(table)
}

fn print_json(body: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(())
}

fn run_init_config(force: bool) -> anyhow::Result<()> {
    let path = Config::active_path();
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let written = Config::default().save()?;
    println!("Config written to {}", written.display());
    Ok(())
}

fn fmt_num(v: Option<f64>) -> String {
    v.map_or_else(|| "-".into(), |x| format!("{x:.3}"))
}

fn run_overview(path: &Path, params: &QualityParams) -> anyhow::Result<()> {
    let table = load(path)?;
    let summary = summarize_dataset(&table);
    let flags = compute_quality_flags_for_table(&table, params)?;
    println!("{:<16} {}", "Rows:", summary.n_rows);
    println!("{:<16} {}", "Columns:", summary.n_cols);
    println!("{:<16} {:.3}", "Quality:", flags.quality_score);
    println!("{:<16} {:.2}%", "Missing cells:", flags.overall_missing_share * 100.0);
    if !flags.how_many_empties.is_empty() {
        println!("{:<16} {}", "Mostly empty:", flags.how_many_empties.join(", "));
    }
    if let Some(d) = flags.duplicate_rows {
        println!("{:<16} {}", "Duplicate rows:", d);
    }
    println!();
    println!(
        "{:<24} {:<12} {:>8} {:>9} {:>10} {:>12} {:>12}",
        "column", "kind", "missing", "distinct", "mean", "std", "max"
    );
    for r in flatten_summary(&summary) {
        println!(
            "{:<24} {:<12} {:>7.1}% {:>9} {:>10} {:>12} {:>12}",
            r.name,
            r.kind,
            r.missing_share * 100.0,
            r.distinct_count,
            fmt_num(r.mean),
            fmt_num(r.std),
            fmt_num(r.max)
        );
    }
    if !flags.may_have_outliers.is_empty() {
        println!();
        for f in &flags.may_have_outliers {
            println!("{:<16} {} = {} ({})", "Outlier:", f.column, f.value, f.direction.as_str());
        }
    }
    Ok(())
}
