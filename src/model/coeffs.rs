//! Fitted quadratic response curves and their live tuning overrides.
//!
//! A coefficient set is loaded once and never mutated. Tuning overrides are
//! layered on at evaluation time: they may replace the linear and/or quadratic
//! term, never the intercept.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::curves::{clamp_or_lo, quadratic};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadraticCoefficients {
    #[serde(alias = "b0", alias = "beta0")]
    pub intercept: f64,
    #[serde(alias = "b1", alias = "beta1")]
    pub linear: f64,
    #[serde(alias = "b2", alias = "beta2")]
    pub quadratic: f64,
}

impl QuadraticCoefficients {
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        quadratic(self.intercept, self.linear, self.quadratic, x)
    }

    /// Coefficients actually used for evaluation once `tuning` is applied.
    pub fn with_overrides(&self, tuning: &TuningOverrides) -> Self {
        Self {
            intercept: self.intercept,
            linear: tuning.linear.unwrap_or(self.linear),
            quadratic: tuning.quadratic.unwrap_or(self.quadratic),
        }
    }
}

/// Live overrides for the linear and quadratic terms. `None` keeps the fitted value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TuningOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quadratic: Option<f64>,
}

impl TuningOverrides {
    pub fn is_empty(&self) -> bool {
        self.linear.is_none() && self.quadratic.is_none()
    }
}

/// A fitted quadratic curve with an optional output clip `[lo, hi]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    #[serde(flatten)]
    pub coefficients: QuadraticCoefficients,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<(f64, f64)>,
}

impl FittedModel {
    pub fn new(intercept: f64, linear: f64, quadratic: f64) -> Self {
        Self {
            coefficients: QuadraticCoefficients {
                intercept,
                linear,
                quadratic,
            },
            clip: None,
        }
    }

    pub fn with_clip(mut self, lo: f64, hi: f64) -> Self {
        self.clip = Some((lo, hi));
        self
    }

    /// Raw curve value at `x` with overrides applied, clipped if a clip is set.
    pub fn evaluate(&self, x: f64, tuning: &TuningOverrides) -> f64 {
        let y = self.coefficients.with_overrides(tuning).eval(x);
        match self.clip {
            Some((lo, hi)) => clamp_or_lo(y, lo, hi),
            None => y,
        }
    }

    pub fn validate(&self) -> Result<(), ModelLoadError> {
        let c = &self.coefficients;
        for (name, v) in [
            ("intercept", c.intercept),
            ("linear", c.linear),
            ("quadratic", c.quadratic),
        ] {
            if !v.is_finite() {
                return Err(ModelLoadError::NonFinite { name });
            }
        }
        if let Some((lo, hi)) = self.clip {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(ModelLoadError::InvalidClip { lo, hi });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to read model {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("coefficient `{name}` is not finite")]
    NonFinite { name: &'static str },
    #[error("clip range [{lo}, {hi}] is invalid")]
    InvalidClip { lo: f64, hi: f64 },
}

/// Parse a coefficient record such as
/// `{"intercept": 0.1, "linear": 0.02, "quadratic": 0.01, "clip": [0, 1]}`.
pub fn parse_model(text: &str) -> Result<FittedModel, ModelLoadError> {
    let model: FittedModel = serde_json::from_str(text)?;
    model.validate()?;
    Ok(model)
}

pub fn load_model(path: &Path) -> Result<FittedModel, ModelLoadError> {
    let text = fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_model(&text)
}

/// Best-effort load: any failure is logged and yields `None`, so the caller
/// keeps its default formula.
pub fn load_model_or_fallback(path: Option<&Path>, label: &str) -> Option<FittedModel> {
    let path = path?;
    match load_model(path) {
        Ok(model) => {
            debug!(target: "model", "{label} model loaded from {}: {:?}", path.display(), model);
            Some(model)
        }
        Err(err) => {
            warn!(target: "model", "{label} model unavailable ({err}); using default formula");
            None
        }
    }
}
