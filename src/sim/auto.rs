use std::time::Duration;

use tracing::debug;

/// Fixed-interval auto-sampling clock. The host advances it by elapsed wall
/// time and fires that many sampling events.
#[derive(Clone, Debug)]
pub struct AutoSampler {
    interval: Duration,
    enabled: bool,
    carry: Duration,
}

impl AutoSampler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            enabled: false,
            carry: Duration::ZERO,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn start(&mut self) {
        if !self.enabled {
            self.enabled = true;
            self.carry = Duration::ZERO;
            debug!("auto-sampling started ({:?} interval)", self.interval);
        }
    }

    pub fn stop(&mut self) {
        if self.enabled {
            self.enabled = false;
            self.carry = Duration::ZERO;
            debug!("auto-sampling stopped");
        }
    }

    /// Flip between running and stopped; returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.enabled {
            self.stop();
        } else {
            self.start();
        }
        self.enabled
    }

    /// Number of sampling events due after `elapsed`. The remainder carries
    /// over to the next call. A zero interval fires once per call.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if !self.enabled {
            return 0;
        }
        if self.interval.is_zero() {
            return 1;
        }
        let total = self.carry + elapsed;
        let due = total.as_nanos() / self.interval.as_nanos();
        let consumed = self.interval.as_nanos() * due;
        self.carry = Duration::from_nanos((total.as_nanos() - consumed) as u64);
        due as usize
    }
}

impl Default for AutoSampler {
    fn default() -> Self {
        Self::from_millis(10)
    }
}
