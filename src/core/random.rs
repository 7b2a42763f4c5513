use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Generator used by sessions: seeded when a seed is given, OS entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Single draw from Normal(mean, stddev).
///
/// `stddev` is taken as given; a zero stddev returns `mean` exactly.
pub fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, stddev: f64) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    mean + stddev * z
}

/// Uniform draw in `[0, 1)`.
pub fn uniform01<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>()
}

/// Bernoulli trial: true with probability `p`.
pub fn bernoulli<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    uniform01(rng) < p
}

/// Uniform index in `0..n`. `n` must be non-zero.
pub fn uniform_index<R: Rng + ?Sized>(rng: &mut R, n: usize) -> usize {
    debug_assert!(n > 0, "uniform_index over empty range");
    rng.random_range(0..n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_moments_converge() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 50_000;
        let draws: Vec<f64> = (0..n).map(|_| normal(&mut rng, 2.0, 0.5)).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        assert!((mean - 2.0).abs() < 0.01, "mean {mean}");
        assert!((var.sqrt() - 0.5).abs() < 0.01, "sd {}", var.sqrt());
    }

    #[test]
    fn zero_stddev_is_degenerate_at_mean() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..16 {
            assert_eq!(normal(&mut rng, -1.25, 0.0), -1.25);
        }
    }

    #[test]
    fn bernoulli_extremes() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!((0..1000).all(|_| !bernoulli(&mut rng, 0.0)));
        assert!((0..1000).all(|_| bernoulli(&mut rng, 1.0)));
    }

    #[test]
    fn seeded_generators_repeat() {
        let mut a = make_rng(Some(9));
        let mut b = make_rng(Some(9));
        for _ in 0..8 {
            assert_eq!(normal(&mut a, 0.0, 1.0), normal(&mut b, 0.0, 1.0));
        }
    }
}
