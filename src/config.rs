use crate::core::bins::LinearBins;
use crate::model::ParamError;
use crate::model::coeffs::TuningOverrides;
use crate::model::population::PopulationParams;
use crate::model::selection::PoliticalTweeting;
use crate::sim::histograms::Scaling;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "ModelConfig::default_n_issues")]
    pub n_issues: usize,
    #[serde(default = "ModelConfig::default_sd_user_mu")]
    pub sd_user_mu: f64,
    #[serde(default = "ModelConfig::default_sd_issue")]
    pub sd_issue: f64,
}

impl ModelConfig {
    fn default_n_issues() -> usize {
        20
    }
    fn default_sd_user_mu() -> f64 {
        1.0
    }
    fn default_sd_issue() -> f64 {
        0.7
    }

    pub fn population(&self) -> PopulationParams {
        PopulationParams {
            n_issues: self.n_issues,
            sd_user_mu: self.sd_user_mu,
            sd_issue: self.sd_issue,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_issues: Self::default_n_issues(),
            sd_user_mu: Self::default_sd_user_mu(),
            sd_issue: Self::default_sd_issue(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramConfig {
    #[serde(default = "HistogramConfig::default_n_bins")]
    pub n_bins: usize,
    #[serde(default = "HistogramConfig::default_min")]
    pub min: f64,
    #[serde(default = "HistogramConfig::default_max")]
    pub max: f64,
    #[serde(default)]
    pub scaling: Scaling,
}

impl HistogramConfig {
    fn default_n_bins() -> usize {
        100
    }
    fn default_min() -> f64 {
        -6.0
    }
    fn default_max() -> f64 {
        6.0
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        if self.n_bins == 0 {
            return Err(ParamError::NoBins);
        }
        if !(self.min.is_finite() && self.max.is_finite() && self.max > self.min) {
            return Err(ParamError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Bin layout. Call [`Self::validate`] first; invalid ranges panic.
    pub fn bins(&self) -> LinearBins {
        LinearBins::new(self.min, self.max, self.n_bins)
    }
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            n_bins: Self::default_n_bins(),
            min: Self::default_min(),
            max: Self::default_max(),
            scaling: Scaling::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Users drawn for the static reference distribution.
    #[serde(default = "SamplingConfig::default_static_users")]
    pub static_users: usize,
    #[serde(default = "SamplingConfig::default_auto_interval_ms")]
    pub auto_interval_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SamplingConfig {
    fn default_static_users() -> usize {
        2000
    }
    fn default_auto_interval_ms() -> u64 {
        10
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            static_users: Self::default_static_users(),
            auto_interval_ms: Self::default_auto_interval_ms(),
            seed: None,
        }
    }
}

/// Optional fitted-model resources. Missing or broken files fall back to the
/// default formulas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default)]
    pub political_path: Option<PathBuf>,
    #[serde(default)]
    pub topic_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TuningConfig {
    #[serde(default)]
    pub political: TuningOverrides,
    #[serde(default)]
    pub topic: TuningOverrides,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub political_tweeting: PoliticalTweeting,
    #[serde(default)]
    pub histogram: HistogramConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub tuning: TuningConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ParamError> {
        self.model.population().validate()?;
        self.histogram.validate()?;
        let pt = &self.political_tweeting;
        for (name, value) in [
            ("political_tweeting.base", pt.base),
            ("political_tweeting.amplitude", pt.amplitude),
            ("political_tweeting.slope", pt.slope),
            ("political_tweeting.center", pt.center),
        ] {
            check_finite(name, value)?;
        }
        for (name, value) in [
            ("tuning.political.linear", self.tuning.political.linear),
            ("tuning.political.quadratic", self.tuning.political.quadratic),
            ("tuning.topic.linear", self.tuning.topic.linear),
            ("tuning.topic.quadratic", self.tuning.topic.quadratic),
        ] {
            if let Some(v) = value {
                check_finite(name, v)?;
            }
        }
        Ok(())
    }

    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        warn!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    warn!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write commented-out defaults and return them.
        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, comment_out_values(&text)) {
                    warn!("Failed to write default config to {path}: {err}");
                } else {
                    info!("Wrote default config to {path}");
                }
            }
            Err(err) => warn!("Failed to serialize default config: {err}; continuing with defaults"),
        }
        default_cfg
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParamError::NonFinite { name, value })
    }
}

/// Keep table headers, prefix every key line with `# `.
fn comment_out_values(text: &str) -> String {
    let mut commented = String::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            commented.push('\n');
        } else if trimmed.starts_with('[') && trimmed.ends_with(']') {
            commented.push_str(line);
            commented.push('\n');
        } else {
            commented.push_str("# ");
            commented.push_str(line);
            commented.push('\n');
        }
    }
    commented
}
