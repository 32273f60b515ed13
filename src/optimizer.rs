// src/optimizer.rs

//! Coordinate-wise, sign-only finite-difference hill climb.
//!
//! One iteration sweeps the parameters in reverse lexicographic order. For
//! each one it probes `x + epsilon`, restores `x`, and moves to
//! `x - step` when the probe raised the error, `x + step` otherwise. Only
//! the sign of the probe is used; the move is always exactly `step`.
//!
//! When a whole sweep fails (per the model's [`ShrinkRule`]) the step is
//! divided by `step_shrink` and the cheat factor by `cheat_shrink`. Neither
//! grows back. There is no divergence detection and no error path.
//!
//! [`ShrinkRule`]: crate::models::ShrinkRule

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::challenge::Challenge;
use crate::mechanics::control;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DescentConfig {
    /// Finite-difference probe offset.
    pub probe_epsilon: f64,
    /// Move magnitude at the start of a run.
    pub initial_step: f64,
    pub step_shrink: f64,
    pub cheat_shrink: f64,
}

impl Default for DescentConfig {
    fn default() -> Self {
        Self {
            probe_epsilon: 0.001,
            initial_step: 0.001,
            step_shrink: 1.1,
            cheat_shrink: 2.0,
        }
    }
}

/// Per-challenge solver state. Both fields only ever decrease.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DescentState {
    pub step_size: f64,
    pub cheat_factor: f64,
}

impl DescentState {
    pub fn new(cfg: &DescentConfig) -> Self {
        Self { step_size: cfg.initial_step, cheat_factor: 1.0 }
    }
}

/// One coordinate move.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterMove {
    pub id: String,
    pub from: f64,
    pub to: f64,
    /// `error(x + epsilon) - error(x)`.
    pub delta: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IterationReport {
    pub error_before: f64,
    pub error_after: f64,
    pub shrunk: bool,
    pub moves: Vec<ParameterMove>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Optimizer {
    config: DescentConfig,
}

impl Optimizer {
    pub fn new(config: DescentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DescentConfig {
        &self.config
    }

    /// One sweep over every parameter of `challenge`. Ignores the lock.
    pub fn iterate(&self, challenge: &mut Challenge) -> IterationReport {
        let eps = self.config.probe_epsilon;
        let error_before = challenge.compute_error();

        let order = challenge.parameters().descent_order();
        let mut moves = Vec::with_capacity(order.len());
        for id in order {
            let step = challenge.descent_state().step_size;
            let x = challenge.parameters().value(&id);
            let e0 = challenge.compute_error();

            challenge.parameters_mut().set_value(&id, x + eps);
            let e1 = challenge.compute_error();
            challenge.parameters_mut().set_value(&id, x);

            let delta = e1 - e0;
            let to = control::signed_step(x, delta, step);
            challenge.parameters_mut().set_value(&id, to);
            trace!(
                challenge = challenge.id(),
                parameter = %id,
                from = x,
                to,
                delta,
                "coordinate move"
            );
            moves.push(ParameterMove { id, from: x, to, delta });
        }

        let error_after = challenge.compute_error();
        let shrunk = challenge.shrink_rule().fires(error_before, error_after);
        if shrunk {
            let state = challenge.descent_state_mut();
            state.step_size = control::shrink(state.step_size, self.config.step_shrink);
            state.cheat_factor = control::shrink(state.cheat_factor, self.config.cheat_shrink);
            debug!(
                challenge = challenge.id(),
                error_before,
                error_after,
                step_size = challenge.descent_state().step_size,
                cheat_factor = challenge.descent_state().cheat_factor,
                "sweep did not improve; shrinking step"
            );
        }

        IterationReport { error_before, error_after, shrunk, moves }
    }
}
