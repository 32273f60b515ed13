// src/models/sdk.rs

//! # Models SDK
//!
//! A **model** is the math behind one puzzle: it declares the parameters the
//! player (or the solver) may move, owns a fixed target dataset, and turns a
//! parameter assignment into a non-negative mean squared error.
//!
//! ## What a model provides
//! 1) **family**: a short static name, used in logs.
//! 2) **parameter_specs**: id, bounds and default of every parameter. Ids are
//!    also the solver's sweep order (reverse lexicographic), so name them so
//!    that the "deepest" parameter sorts last.
//! 3) **mean_squared_error**: MSE between model output and target under the
//!    given values. Pure and deterministic; never negative.
//! 4) **error_scale**: an ad hoc factor mapping the visible error roughly
//!    onto `[0, 1]`. Does not affect where the minimum is.
//! 5) **shrink_rule** (optional): when a failed sweep shrinks the solver's
//!    step. Curve fits use the strict rule, propagation models the default.
//!
//! ## What the challenge adds on top
//! `Challenge::compute_error = mse * error_scale * cheat_factor`. The cheat
//! factor belongs to the challenge, not the model: it halves after every
//! failed sweep and only ever scales the *scored* error.
//!
//! ## Construction-time checks
//! There is no "abstract" model: every required method must exist for the
//! type to implement [`Model`] at all. What the compiler cannot see, the
//! constructors check:
//! - each family's own constructor validates its dataset/topology and
//!   returns [`ModelError`](crate::ModelError) on inconsistencies;
//! - `Challenge::new` validates the parameter declarations and evaluates the
//!   error once at the defaults, refusing non-finite results.
//!
//! ## Adding a family
//! - New file under `src/models/`, one struct owning its target data.
//! - Read parameters with `ParameterSet::value(id)` for ids you declared.
//!   Reading an undeclared id panics: it means the model is broken.
//! - Keep the error function cheap. The solver evaluates it `2n + 2` times
//!   per iteration for `n` parameters.

use crate::parameter::{ParameterSet, ParameterSpec};

/// When a sweep counts as failed and shrinks the step and cheat factor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShrinkRule {
    /// Shrink only when the sweep made the error strictly worse.
    OnRegression,
    /// Shrink whenever the sweep failed to strictly improve.
    #[default]
    OnNoImprovement,
}

impl ShrinkRule {
    #[inline]
    pub fn fires(self, error_before: f64, error_after: f64) -> bool {
        match self {
            ShrinkRule::OnRegression => error_after > error_before,
            ShrinkRule::OnNoImprovement => error_after >= error_before,
        }
    }
}

pub trait Model {
    fn family(&self) -> &'static str;

    fn parameter_specs(&self) -> Vec<ParameterSpec>;

    fn mean_squared_error(&self, params: &ParameterSet) -> f64;

    fn error_scale(&self) -> f64;

    fn shrink_rule(&self) -> ShrinkRule {
        ShrinkRule::OnNoImprovement
    }
}
