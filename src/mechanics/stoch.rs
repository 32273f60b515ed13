/// Stochastic mechanics: seeded WyRand helpers for scrambles and jitter.
/// Note: everything here takes `&mut WyRand`; callers own the generator so
/// a fixed seed reproduces the same puzzle.
use bevy_prng::WyRand;
use rand_core::{RngCore, SeedableRng};

/// Generator seeded from a plain `u64`.
#[inline]
pub fn seeded(seed: u64) -> WyRand {
    WyRand::from_seed(seed.to_le_bytes())
}

/// Uniform sample in [0, 1) from the top 53 bits.
#[inline]
pub fn uniform01(rng: &mut WyRand) -> f64 {
    ((rng.next_u64() >> 11) as f64) / ((1u64 << 53) as f64)
}

/// Uniform sample in [lo, hi).
#[inline]
pub fn uniform_in(rng: &mut WyRand, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * uniform01(rng)
}

/// Gaussian(0,1) via Box-Muller.
#[inline]
pub fn gaussian01(rng: &mut WyRand) -> f64 {
    // 1 - u keeps the log argument in (0, 1].
    let u1 = 1.0 - uniform01(rng);
    let u2 = uniform01(rng);
    let r = (-2.0 * u1.ln()).sqrt();
    let t = 2.0 * std::f64::consts::PI * u2;
    r * t.cos()
}
