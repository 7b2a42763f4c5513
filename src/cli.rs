use clap::Parser;
use std::path::PathBuf;

use shadowpost::config::AppConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML
    #[arg(long, default_value = "shadowpost.toml")]
    pub config: String,

    /// Number of users to sample (ignored with --auto-sec)
    #[arg(long, default_value_t = 1000)]
    pub samples: usize,

    /// Seed for reproducible runs (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Issues per user (overrides config)
    #[arg(long)]
    pub n_issues: Option<usize>,

    /// Fitted political-probability model (JSON)
    #[arg(long)]
    pub political_model: Option<PathBuf>,

    /// Fitted topic-weight model (JSON)
    #[arg(long)]
    pub topic_model: Option<PathBuf>,

    /// Override the political model's linear term
    #[arg(long, allow_hyphen_values = true)]
    pub political_linear: Option<f64>,

    /// Override the political model's quadratic term
    #[arg(long, allow_hyphen_values = true)]
    pub political_quadratic: Option<f64>,

    /// Override the topic model's linear term
    #[arg(long, allow_hyphen_values = true)]
    pub topic_linear: Option<f64>,

    /// Override the topic model's quadratic term
    #[arg(long, allow_hyphen_values = true)]
    pub topic_quadratic: Option<f64>,

    /// Auto-sample at the configured interval for this many seconds (Ctrl-C stops)
    #[arg(long)]
    pub auto_sec: Option<f64>,

    /// Write a JSON snapshot of all histograms here
    #[arg(long)]
    pub json_out: Option<PathBuf>,

    /// Columns used by the text report
    #[arg(long, default_value_t = 100)]
    pub width: usize,
}

impl Args {
    /// Layer command-line overrides on top of the loaded config.
    pub fn apply(&self, cfg: &mut AppConfig) {
        if let Some(seed) = self.seed {
            cfg.sampling.seed = Some(seed);
        }
        if let Some(n) = self.n_issues {
            cfg.model.n_issues = n;
        }
        if let Some(p) = &self.political_model {
            cfg.models.political_path = Some(p.clone());
        }
        if let Some(p) = &self.topic_model {
            cfg.models.topic_path = Some(p.clone());
        }
        if self.political_linear.is_some() {
            cfg.tuning.political.linear = self.political_linear;
        }
        if self.political_quadratic.is_some() {
            cfg.tuning.political.quadratic = self.political_quadratic;
        }
        if self.topic_linear.is_some() {
            cfg.tuning.topic.linear = self.topic_linear;
        }
        if self.topic_quadratic.is_some() {
            cfg.tuning.topic.quadratic = self.topic_quadratic;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_only_touch_given_fields() {
        let args = Args::parse_from([
            "shadowpost",
            "--seed",
            "12",
            "--n-issues",
            "8",
            "--topic-quadratic",
            "-0.01",
        ]);
        let mut cfg = AppConfig::default();
        args.apply(&mut cfg);
        assert_eq!(cfg.sampling.seed, Some(12));
        assert_eq!(cfg.model.n_issues, 8);
        assert_eq!(cfg.tuning.topic.quadratic, Some(-0.01));
        assert_eq!(cfg.tuning.topic.linear, None);
        assert!(cfg.tuning.political.is_empty());
        assert!(cfg.models.political_path.is_none());
        assert_eq!(args.samples, 1000);
    }
}
