use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ParamError;
use crate::core::random::normal;

/// Hierarchical normal model: `mu ~ N(0, sd_user_mu)`, `issue_i ~ N(mu, sd_issue)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationParams {
    pub n_issues: usize,
    pub sd_user_mu: f64,
    pub sd_issue: f64,
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self {
            n_issues: 20,
            sd_user_mu: 1.0,
            sd_issue: 0.7,
        }
    }
}

impl PopulationParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.n_issues == 0 {
            return Err(ParamError::NoIssues);
        }
        check_stddev("sd_user_mu", self.sd_user_mu)?;
        check_stddev("sd_issue", self.sd_issue)?;
        Ok(())
    }
}

fn check_stddev(name: &'static str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ParamError::InvalidStdDev { name, value })
    }
}

/// One simulated user. Lives for a single sampling event.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub mu: f64,
    pub issues: Vec<f64>,
    pub true_mean: f64,
}

/// Draw a user with `params.n_issues` issue attitudes around a latent center.
///
/// Panics if `params.n_issues == 0`; callers validate params up front.
pub fn sample_user<R: Rng + ?Sized>(params: &PopulationParams, rng: &mut R) -> User {
    assert!(params.n_issues > 0, "sample_user: n_issues must be positive");
    let mu = normal(rng, 0.0, params.sd_user_mu);
    let issues: Vec<f64> = (0..params.n_issues)
        .map(|_| normal(rng, mu, params.sd_issue))
        .collect();
    let true_mean = issues.iter().sum::<f64>() / issues.len() as f64;
    User {
        mu,
        issues,
        true_mean,
    }
}

/// Same draw as [`sample_user`] but keeps only the true mean (no allocation).
pub fn sample_true_mean<R: Rng + ?Sized>(params: &PopulationParams, rng: &mut R) -> f64 {
    assert!(params.n_issues > 0, "sample_true_mean: n_issues must be positive");
    let mu = normal(rng, 0.0, params.sd_user_mu);
    let mut sum = 0.0;
    for _ in 0..params.n_issues {
        sum += normal(rng, mu, params.sd_issue);
    }
    sum / params.n_issues as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn user_has_requested_issue_count_and_mean() {
        let mut rng = StdRng::seed_from_u64(7);
        for n_issues in [1, 3, 20, 50] {
            let params = PopulationParams {
                n_issues,
                ..PopulationParams::default()
            };
            let user = sample_user(&params, &mut rng);
            assert_eq!(user.issues.len(), n_issues);
            let mean = user.issues.iter().sum::<f64>() / n_issues as f64;
            assert_relative_eq!(user.true_mean, mean, epsilon = 1e-12);
        }
    }

    #[test]
    fn zero_issue_spread_collapses_onto_mu() {
        let mut rng = StdRng::seed_from_u64(11);
        let params = PopulationParams {
            n_issues: 5,
            sd_user_mu: 1.0,
            sd_issue: 0.0,
        };
        let user = sample_user(&params, &mut rng);
        assert!(user.issues.iter().all(|&v| v == user.mu));
        assert_relative_eq!(user.true_mean, user.mu, epsilon = 1e-12);
    }

    #[test]
    fn true_mean_spread_matches_hierarchy() {
        // Var(trueMean) = sd_user_mu^2 + sd_issue^2 / n_issues
        let mut rng = StdRng::seed_from_u64(2024);
        let params = PopulationParams::default();
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| sample_true_mean(&params, &mut rng)).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let expected = 1.0 + 0.49 / 20.0;
        assert!(mean.abs() < 0.03, "mean {mean}");
        assert!((var - expected).abs() < 0.05, "var {var} vs {expected}");
    }

    #[test]
    fn validate_rejects_bad_params() {
        let mut p = PopulationParams::default();
        assert!(p.validate().is_ok());
        p.n_issues = 0;
        assert!(matches!(p.validate(), Err(ParamError::NoIssues)));
        p.n_issues = 3;
        p.sd_issue = f64::NAN;
        assert!(matches!(
            p.validate(),
            Err(ParamError::InvalidStdDev { name: "sd_issue", .. })
        ));
        p.sd_issue = 0.7;
        p.sd_user_mu = -1.0;
        assert!(p.validate().is_err());
    }

    #[test]
    #[should_panic]
    fn sampling_without_issues_fails_fast() {
        let mut rng = StdRng::seed_from_u64(0);
        let params = PopulationParams {
            n_issues: 0,
            ..PopulationParams::default()
        };
        let _ = sample_user(&params, &mut rng);
    }
}
