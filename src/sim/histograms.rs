//! The five named histograms shared by one session, all over the same bins.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::core::bins::{Histogram, LinearBins};
use crate::model::population::{PopulationParams, sample_true_mean};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistogramName {
    /// Static reference: true means of a large population sample.
    TrueAll,
    TweetAuthorsPolitical,
    TweetAuthorsNonPolitical,
    /// Attitudes on the issue a political post was about.
    PostedAttitudes,
    /// Attitudes of political posters on every other issue.
    ShadowAttitudes,
}

impl HistogramName {
    pub const ALL: [HistogramName; 5] = [
        Self::TrueAll,
        Self::TweetAuthorsPolitical,
        Self::TweetAuthorsNonPolitical,
        Self::PostedAttitudes,
        Self::ShadowAttitudes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TrueAll => "trueAll",
            Self::TweetAuthorsPolitical => "tweetAuthorsPolitical",
            Self::TweetAuthorsNonPolitical => "tweetAuthorsNonPolitical",
            Self::PostedAttitudes => "postedAttitudes",
            Self::ShadowAttitudes => "shadowAttitudes",
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HistogramName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How overlaid distributions in one panel are scaled to bar heights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scaling {
    /// One max across the overlaid histograms (raw comparison).
    #[default]
    Shared,
    /// Each histogram scaled to its own max.
    Independent,
}

/// Moments of a histogram, computed from bin centers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistogramSummary {
    pub total: u64,
    pub mean: f64,
    pub sd: f64,
}

#[derive(Clone, Debug)]
pub struct HistogramSet {
    bins: LinearBins,
    hists: [Histogram; 5],
}

impl HistogramSet {
    pub fn new(bins: LinearBins) -> Self {
        Self {
            bins,
            hists: std::array::from_fn(|_| Histogram::new(bins.n_bins)),
        }
    }

    #[inline]
    pub fn bins(&self) -> &LinearBins {
        &self.bins
    }

    /// Zero one histogram.
    pub fn init(&mut self, name: HistogramName) {
        let n = self.bins.n_bins;
        self.hists[name.slot()].reset(n);
    }

    pub fn init_all(&mut self) {
        for name in HistogramName::ALL {
            self.init(name);
        }
    }

    /// Switch to a new bin layout; every histogram is zeroed.
    pub fn rebin(&mut self, bins: LinearBins) {
        self.bins = bins;
        self.init_all();
    }

    /// Count `value` in `name`. Values outside `[min, max)` are dropped.
    pub fn add_value(&mut self, name: HistogramName, value: f64) -> bool {
        self.hists[name.slot()].add(&self.bins, value)
    }

    pub fn counts(&self, name: HistogramName) -> &[u64] {
        self.hists[name.slot()].counts()
    }

    pub fn total(&self, name: HistogramName) -> u64 {
        self.hists[name.slot()].total()
    }

    /// Largest count, never below 1.
    pub fn max_count(&self, name: HistogramName) -> u64 {
        self.hists[name.slot()].max_count()
    }

    /// Largest count across several histograms, never below 1.
    pub fn joint_max_count(&self, names: &[HistogramName]) -> u64 {
        names
            .iter()
            .map(|&n| self.max_count(n))
            .max()
            .unwrap_or(1)
    }

    /// Bar heights in `[0, 1]` for histograms overlaid in one panel.
    pub fn normalized(&self, names: &[HistogramName], scaling: Scaling) -> Vec<Vec<f64>> {
        let shared = self.joint_max_count(names);
        names
            .iter()
            .map(|&name| {
                let denom = match scaling {
                    Scaling::Shared => shared,
                    Scaling::Independent => self.max_count(name),
                };
                self.counts(name)
                    .iter()
                    .map(|&c| c as f64 / denom as f64)
                    .collect()
            })
            .collect()
    }

    pub fn summary(&self, name: HistogramName) -> HistogramSummary {
        let hist = &self.hists[name.slot()];
        if hist.is_empty() {
            return HistogramSummary::default();
        }
        let counts = hist.counts();
        let total = hist.total();
        let n = total as f64;
        let mean = counts
            .iter()
            .enumerate()
            .map(|(i, &c)| c as f64 * self.bins.center(i))
            .sum::<f64>()
            / n;
        let var = counts
            .iter()
            .enumerate()
            .map(|(i, &c)| c as f64 * (self.bins.center(i) - mean).powi(2))
            .sum::<f64>()
            / n;
        HistogramSummary {
            total,
            mean,
            sd: var.sqrt(),
        }
    }

    /// Zero `name` and refill it with the true means of `n_samples` fresh users.
    /// Returns how many landed inside the range.
    pub fn populate_static<R: Rng + ?Sized>(
        &mut self,
        name: HistogramName,
        n_samples: usize,
        params: &PopulationParams,
        rng: &mut R,
    ) -> u64 {
        self.init(name);
        let mut landed = 0;
        for _ in 0..n_samples {
            if self.add_value(name, sample_true_mean(params, rng)) {
                landed += 1;
            }
        }
        debug!(
            target: "histogram",
            "populated {name} with {landed}/{n_samples} samples (n_issues={})",
            params.n_issues
        );
        landed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn set() -> HistogramSet {
        HistogramSet::new(LinearBins::new(-6.0, 6.0, 100))
    }

    #[test]
    fn histograms_are_independent() {
        let mut h = set();
        h.add_value(HistogramName::PostedAttitudes, 1.0);
        h.add_value(HistogramName::PostedAttitudes, 1.01);
        h.add_value(HistogramName::ShadowAttitudes, -1.0);
        assert_eq!(h.total(HistogramName::PostedAttitudes), 2);
        assert_eq!(h.total(HistogramName::ShadowAttitudes), 1);
        assert_eq!(h.total(HistogramName::TrueAll), 0);
    }

    #[test]
    fn init_zeroes_regardless_of_state() {
        let mut h = set();
        for i in 0..500 {
            h.add_value(HistogramName::ShadowAttitudes, (i as f64) * 0.01 - 2.5);
        }
        h.init(HistogramName::ShadowAttitudes);
        assert!(h.counts(HistogramName::ShadowAttitudes).iter().all(|&c| c == 0));
        assert_eq!(h.counts(HistogramName::ShadowAttitudes).len(), 100);
        h.init(HistogramName::ShadowAttitudes);
        assert_eq!(h.total(HistogramName::ShadowAttitudes), 0);
    }

    #[test]
    fn shared_scaling_uses_joint_max() {
        let mut h = set();
        for _ in 0..4 {
            h.add_value(HistogramName::ShadowAttitudes, 0.05);
        }
        h.add_value(HistogramName::PostedAttitudes, 0.05);
        let names = [HistogramName::PostedAttitudes, HistogramName::ShadowAttitudes];
        assert_eq!(h.joint_max_count(&names), 4);

        let shared = h.normalized(&names, Scaling::Shared);
        assert_eq!(shared[0][50], 0.25);
        assert_eq!(shared[1][50], 1.0);

        let indep = h.normalized(&names, Scaling::Independent);
        assert_eq!(indep[0][50], 1.0);
        assert_eq!(indep[1][50], 1.0);
    }

    #[test]
    fn empty_histograms_normalize_to_zero() {
        let h = set();
        let bars = h.normalized(&[HistogramName::TweetAuthorsPolitical], Scaling::Shared);
        assert!(bars[0].iter().all(|&b| b == 0.0));
        assert_eq!(h.summary(HistogramName::TrueAll), HistogramSummary::default());
    }

    #[test]
    fn summary_recovers_point_mass() {
        let mut h = HistogramSet::new(LinearBins::new(0.0, 10.0, 10));
        for _ in 0..10 {
            h.add_value(HistogramName::TrueAll, 3.3);
        }
        let s = h.summary(HistogramName::TrueAll);
        assert_eq!(s.total, 10);
        assert_eq!(s.mean, 3.5);
        assert_eq!(s.sd, 0.0);
    }

    #[test]
    fn populate_static_replaces_previous_counts() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut h = set();
        for _ in 0..50 {
            h.add_value(HistogramName::TrueAll, 5.5);
        }
        let params = PopulationParams::default();
        let landed = h.populate_static(HistogramName::TrueAll, 300, &params, &mut rng);
        assert_eq!(h.total(HistogramName::TrueAll), landed);
        assert!(landed <= 300);
        assert!(h.counts(HistogramName::TrueAll)[95] < 50);
    }
}
