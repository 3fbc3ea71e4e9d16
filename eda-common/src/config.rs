use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    #[serde(default = "default_outlier_k")]
    pub outlier_k: f64,
    #[serde(default = "default_missing_threshold")]
    pub missing_share_threshold: f64,
    #[serde(default = "default_min_rows")]
    pub min_rows: usize,
}

fn default_outlier_k() -> f64 {
    2.5
}
fn default_missing_threshold() -> f64 {
    0.3
}
fn default_min_rows() -> usize {
    100
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            outlier_k: default_outlier_k(),
            missing_share_threshold: default_missing_threshold(),
            min_rows: default_min_rows(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_max_columns")]
    pub max_columns: usize,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_top_k() -> usize {
    5
}
fn default_max_columns() -> usize {
    5
}
fn default_preview_rows() -> usize {
    5
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_columns: default_max_columns(),
            preview_rows: default_preview_rows(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleConfig {
    #[serde(default = "default_sample_n")]
    pub n: usize,
    #[serde(default = "default_random_state")]
    pub random_state: u64,
}

fn default_sample_n() -> usize {
    5
}
fn default_random_state() -> u64 {
    42
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            n: default_sample_n(),
            random_state: default_random_state(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String {
    "reports".into()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub quality: QualityConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub sample: SampleConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eda-cli")
            .join("config.toml")
    }

    /// `$EDA_CLI_CONFIG` when set, else [`Config::config_path`].
    pub fn active_path() -> PathBuf {
        match std::env::var("EDA_CLI_CONFIG") {
            Ok(env_path) => PathBuf::from(env_path),
            Err(_) => Self::config_path(),
        }
    }

    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::active_path())
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let cfg: Self =
            toml::from_str(&content).map_err(|e| crate::EdaError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self) -> crate::Result<PathBuf> {
        let path = Self::active_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::EdaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> crate::Result<()> {
        check_quality_bounds(self.quality.outlier_k, self.quality.missing_share_threshold)
    }
}

/// Bounds shared by the config file and the engine's quality parameters.
pub fn check_quality_bounds(outlier_k: f64, missing_share_threshold: f64) -> crate::Result<()> {
    if !outlier_k.is_finite() || outlier_k < 0.0 {
        return Err(crate::EdaError::validation(format!(
            "outlier_k must be a non-negative number, got {outlier_k}"
        )));
    }
    if !(0.0..=1.0).contains(&missing_share_threshold) {
        return Err(crate::EdaError::validation(format!(
            "missing_share_threshold must be within [0, 1], got {missing_share_threshold}"
        )));
    }
    Ok(())
}
