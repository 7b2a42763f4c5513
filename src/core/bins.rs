//! core/bins.rs — Equal-width bins over a closed-open range `[min, max)`.
//!
//! Values outside the range have no bin; they are dropped by callers rather
//! than clipped into the edge bins.

/// Uniform linear binning of `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearBins {
    pub min: f64,
    pub max: f64,
    pub n_bins: usize,
}

impl LinearBins {
    /// Create `n_bins` equal-width bins over `[min, max)`.
    pub fn new(min: f64, max: f64, n_bins: usize) -> Self {
        assert!(min.is_finite() && max.is_finite() && max > min);
        assert!(n_bins > 0);
        Self { min, max, n_bins }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        (self.max - self.min) / self.n_bins as f64
    }

    /// Bin containing `value`, or `None` when `value` is outside `[min, max)` or NaN.
    /// An in-range value whose index rounds up to `n_bins` is kept in the last
    /// bin rather than dropped.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        if !(value >= self.min && value < self.max) {
            return None;
        }
        let idx = ((value - self.min) / self.width()).floor() as usize;
        // value < max but the division can round up to n_bins at the top edge
        Some(idx.min(self.n_bins - 1))
    }

    /// Center of bin `i` on the value axis.
    pub fn center(&self, i: usize) -> f64 {
        self.lower_edge(i) + 0.5 * self.width()
    }

    /// Lower edge of bin `i`.
    pub fn lower_edge(&self, i: usize) -> f64 {
        self.min + i as f64 * self.width()
    }
}

/// Fixed-size count array laid out over a [`LinearBins`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u64>,
}

impl Histogram {
    pub fn new(n_bins: usize) -> Self {
        Self {
            counts: vec![0; n_bins],
        }
    }

    /// Zero every bin, resizing to `n_bins` if the layout changed.
    pub fn reset(&mut self, n_bins: usize) {
        self.counts.clear();
        self.counts.resize(n_bins, 0);
    }

    /// Add one observation. Returns whether it landed in a bin.
    pub fn add(&mut self, bins: &LinearBins, value: f64) -> bool {
        debug_assert_eq!(self.counts.len(), bins.n_bins, "histogram/bins length mismatch");
        match bins.index_of(value).and_then(|i| self.counts.get_mut(i)) {
            Some(c) => {
                *c += 1;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Largest bin count, floored at 1 so it is always a safe divisor.
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0).max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }
}
