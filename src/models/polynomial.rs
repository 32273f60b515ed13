//! Polynomial curve fit (degree 0..=4) against a fixed point cloud.
//!
//! Coefficients are named `a0..aN` in ascending powers, so the solver sweeps
//! the highest power first.

use bevy_prng::WyRand;

use crate::error::ModelError;
use crate::mechanics::{horner, jitter, linspace, mean_squared, sample_curve};
use crate::models::sdk::{Model, ShrinkRule};
use crate::parameter::{ParameterSet, ParameterSpec};

pub const MAX_DEGREE: usize = 4;

#[derive(Clone, Debug)]
pub struct PolynomialModel {
    points: Vec<(f64, f64)>,
    coefficients: Vec<ParameterSpec>,
    error_scale: f64,
}

impl PolynomialModel {
    /// Coefficients default to 0 inside `[-2, 2]`.
    pub fn new(degree: usize, points: Vec<(f64, f64)>, error_scale: f64) -> Result<Self, ModelError> {
        if degree > MAX_DEGREE {
            return Err(ModelError::UnsupportedDegree(degree));
        }
        if points.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        let coefficients = (0..=degree)
            .map(|k| ParameterSpec::new(Self::coefficient_id(k), -2.0, 2.0, 0.0))
            .collect();
        Ok(Self { points, coefficients, error_scale })
    }

    /// Straight line `a0 + a1 x`, with a wider intercept range.
    pub fn line(points: Vec<(f64, f64)>, error_scale: f64) -> Result<Self, ModelError> {
        Self::new(1, points, error_scale)?.with_coefficient_bounds(0, -7.0, 7.0, 0.0)
    }

    /// Fit target sampled from the polynomial `truth` (ascending coefficients)
    /// at `n` evenly spaced abscissae over `[lo, hi]`.
    pub fn sampled(truth: &[f64], lo: f64, hi: f64, n: usize, error_scale: f64) -> Result<Self, ModelError> {
        let degree = truth.len().saturating_sub(1);
        Self::new(degree, sample_curve(|x| horner(truth, x), lo, hi, n), error_scale)
    }

    /// Same as [`sampled`](Self::sampled) with N(0, sigma) noise on every ordinate.
    pub fn sampled_noisy(
        truth: &[f64],
        lo: f64,
        hi: f64,
        n: usize,
        sigma: f64,
        rng: &mut WyRand,
        error_scale: f64,
    ) -> Result<Self, ModelError> {
        let clean = sample_curve(|x| horner(truth, x), lo, hi, n);
        let degree = truth.len().saturating_sub(1);
        Self::new(degree, jitter(&clean, sigma, rng), error_scale)
    }

    pub fn with_coefficient_bounds(mut self, k: usize, min: f64, max: f64, default: f64) -> Result<Self, ModelError> {
        if k >= self.coefficients.len() {
            return Err(ModelError::UnsupportedDegree(k));
        }
        let spec = ParameterSpec::new(Self::coefficient_id(k), min, max, default);
        spec.validate()?;
        self.coefficients[k] = spec;
        Ok(self)
    }

    pub fn coefficient_id(k: usize) -> String {
        format!("a{k}")
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    fn coefficient_values(&self, params: &ParameterSet) -> Vec<f64> {
        self.coefficients.iter().map(|c| params.value(&c.id)).collect()
    }

    pub fn evaluate(&self, params: &ParameterSet, x: f64) -> f64 {
        horner(&self.coefficient_values(params), x)
    }

    /// Current curve sampled for drawing.
    pub fn curve(&self, params: &ParameterSet, lo: f64, hi: f64, samples: usize) -> Vec<(f64, f64)> {
        let coeffs = self.coefficient_values(params);
        linspace(lo, hi, samples)
            .into_iter()
            .map(|x| (x, horner(&coeffs, x)))
            .collect()
    }
}

impl Model for PolynomialModel {
    fn family(&self) -> &'static str {
        "polynomial"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        self.coefficients.clone()
    }

    fn mean_squared_error(&self, params: &ParameterSet) -> f64 {
        let coeffs = self.coefficient_values(params);
        mean_squared(self.points.iter().map(|&(x, y)| horner(&coeffs, x) - y))
    }

    fn error_scale(&self) -> f64 {
        self.error_scale
    }

    fn shrink_rule(&self) -> ShrinkRule {
        ShrinkRule::OnRegression
    }
}
