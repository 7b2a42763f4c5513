//! Two-stage selection: does a user's post concern politics, and if so which
//! of the user's issues it is about.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::coeffs::{FittedModel, TuningOverrides};
use crate::core::curves::{clamp_or_lo, sigmoid};
use crate::core::random::{bernoulli, uniform_index, uniform01};

/// Logistic-shaped fallback: `base + amplitude * sigmoid(slope * (x - center))`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoliticalTweeting {
    pub base: f64,
    pub amplitude: f64,
    pub slope: f64,
    pub center: f64,
}

impl Default for PoliticalTweeting {
    fn default() -> Self {
        Self {
            base: 0.05,
            amplitude: 0.25,
            slope: 0.8,
            center: 0.0,
        }
    }
}

impl PoliticalTweeting {
    pub fn probability(&self, x: f64) -> f64 {
        let s = sigmoid(self.slope * (x - self.center));
        clamp_or_lo(self.base + self.amplitude * s, 0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PoliticalModel {
    Fallback(PoliticalTweeting),
    Fitted(FittedModel),
}

impl PoliticalModel {
    /// Probability in `[0, 1]` that a post by a user at ideology `x` is political.
    ///
    /// A fitted model without its own clip is clipped to `[0, 1]`; one with a
    /// clip is clipped to it and then to `[0, 1]`.
    pub fn probability(&self, x: f64, tuning: &TuningOverrides) -> f64 {
        match self {
            Self::Fallback(p) => p.probability(x),
            Self::Fitted(m) => {
                let (lo, hi) = m.clip.unwrap_or((0.0, 1.0));
                let y = m.coefficients.with_overrides(tuning).eval(x);
                clamp_or_lo(clamp_or_lo(y, lo, hi), 0.0, 1.0)
            }
        }
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self, Self::Fitted(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum TopicModel {
    /// Weight proportional to `|x|`.
    #[default]
    AbsoluteExtremity,
    Fitted(FittedModel),
}

impl TopicModel {
    /// Non-negative selection weight of an issue with attitude `x`.
    pub fn weight(&self, x: f64, tuning: &TuningOverrides) -> f64 {
        match self {
            Self::AbsoluteExtremity => x.abs(),
            Self::Fitted(m) => {
                let w = m.evaluate(x, tuning);
                if w > 0.0 { w } else { 0.0 }
            }
        }
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self, Self::Fitted(_))
    }
}

/// Both selection stages plus their live tuning overrides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionModel {
    pub political: PoliticalModel,
    pub topic: TopicModel,
    pub political_tuning: TuningOverrides,
    pub topic_tuning: TuningOverrides,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self {
            political: PoliticalModel::Fallback(PoliticalTweeting::default()),
            topic: TopicModel::AbsoluteExtremity,
            political_tuning: TuningOverrides::default(),
            topic_tuning: TuningOverrides::default(),
        }
    }
}

impl SelectionModel {
    pub fn political_probability(&self, x: f64) -> f64 {
        self.political.probability(x, &self.political_tuning)
    }

    /// Bernoulli draw against [`Self::political_probability`]. Returns `(p, is_political)`.
    pub fn decide_political<R: Rng + ?Sized>(&self, x: f64, rng: &mut R) -> (f64, bool) {
        let p = self.political_probability(x);
        (p, bernoulli(rng, p))
    }

    pub fn topic_weights(&self, issues: &[f64]) -> Vec<f64> {
        issues
            .iter()
            .map(|&x| self.topic.weight(x, &self.topic_tuning))
            .collect()
    }

    /// Index of the issue a political post is about. `None` only for an empty slice.
    pub fn choose_topic<R: Rng + ?Sized>(&self, issues: &[f64], rng: &mut R) -> Option<usize> {
        let weights = self.topic_weights(issues);
        choose_weighted_index(&weights, rng)
    }
}

/// Probability-proportional-to-weight pick by sequential subtraction.
///
/// A non-positive (or NaN) weight total falls back to a uniform pick. If
/// rounding leaves `r` above zero after the last weight, the last index wins.
pub fn choose_weighted_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let sum: f64 = weights.iter().sum();
    if !(sum > 0.0) {
        return Some(uniform_index(rng, weights.len()));
    }
    let mut r = uniform01(rng) * sum;
    for (i, w) in weights.iter().enumerate() {
        r -= w;
        if r <= 0.0 {
            return Some(i);
        }
    }
    Some(weights.len() - 1)
}
