//! Scalar response curves shared by the selection model and the reference overlay.

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// `b0 + b1*x + b2*x^2`
pub fn quadratic(b0: f64, b1: f64, b2: f64, x: f64) -> f64 {
    b0 + b1 * x + b2 * x * x
}

/// Clamp into `[lo, hi]`; NaN maps to `lo`. Never panics on odd bounds.
pub fn clamp_or_lo(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

pub fn standard_normal_pdf(x: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal density sampled at `n_points` evenly spaced x in `[min, max]`.
/// Heights are scaled so the peak is 1.
pub fn reference_density(min: f64, max: f64, n_points: usize) -> Vec<(f64, f64)> {
    if n_points < 2 {
        return Vec::new();
    }
    let pts: Vec<(f64, f64)> = (0..n_points)
        .map(|i| {
            let x = min + (max - min) * (i as f64 / (n_points - 1) as f64);
            (x, standard_normal_pdf(x))
        })
        .collect();
    let peak = pts.iter().map(|p| p.1).fold(0.0, f64::max);
    if peak <= 0.0 {
        return pts;
    }
    pts.into_iter().map(|(x, y)| (x, y / peak)).collect()
}
