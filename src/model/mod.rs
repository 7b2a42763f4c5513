//! Generative population model and the two selection stages applied to it.

pub mod coeffs;
pub mod population;
pub mod selection;

use thiserror::Error;

/// Precondition violations in model or histogram parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("n_issues must be at least 1")]
    NoIssues,
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidStdDev { name: &'static str, value: f64 },
    #[error("histogram range [{min}, {max}) is empty or not finite")]
    InvalidRange { min: f64, max: f64 },
    #[error("histogram needs at least one bin")]
    NoBins,
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
}
