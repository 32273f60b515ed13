/// Control mechanics: the coordinate move and the shrink schedule.

/// Sign-only coordinate move: step down when nudging up made things worse.
#[inline]
pub fn signed_step(x: f64, delta: f64, step: f64) -> f64 {
    if delta > 0.0 { x - step } else { x + step }
}

/// Geometric decay: x' = x / factor.
#[inline]
pub fn shrink(x: f64, factor: f64) -> f64 {
    x / factor
}
