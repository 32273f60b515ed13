/// Residual mechanics: squared-error reductions and activation limits.

pub const ACTIVATION_MIN: f64 = 0.0;
pub const ACTIVATION_MAX: f64 = 100.0;

/// Mean of squared residuals; 0 for an empty input.
#[inline]
pub fn mean_squared<I>(residuals: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = residuals
        .into_iter()
        .fold((0.0, 0usize), |(s, n), r| (s + r * r, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Neuron activation limit: clamp(0, 100, x).
#[inline]
pub fn clamp_activation(x: f64) -> f64 {
    x.clamp(ACTIVATION_MIN, ACTIVATION_MAX)
}
