/// Sampling mechanics: evenly spaced abscissae and point clouds.
use bevy_prng::WyRand;

use super::stoch;

/// `n` evenly spaced points over [lo, hi], both ends included.
/// A single point sits at `lo`.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => (0..n)
            .map(|i| lo + (hi - lo) * (i as f64 / (n - 1) as f64))
            .collect(),
    }
}

/// Polynomial value with coefficients in ascending order (a0 + a1 x + ...).
#[inline]
pub fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Point cloud sampled from `f` at `n` evenly spaced abscissae.
pub fn sample_curve<F>(f: F, lo: f64, hi: f64, n: usize) -> Vec<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    linspace(lo, hi, n).into_iter().map(|x| (x, f(x))).collect()
}

/// Adds N(0, sigma) noise to every ordinate. `sigma <= 0` leaves the cloud as is.
pub fn jitter(points: &[(f64, f64)], sigma: f64, rng: &mut WyRand) -> Vec<(f64, f64)> {
    if sigma <= 0.0 {
        return points.to_vec();
    }
    points
        .iter()
        .map(|&(x, y)| (x, y + sigma * stoch::gaussian01(rng)))
        .collect()
}
