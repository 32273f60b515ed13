// src/challenge.rs

//! One puzzle: a model, its parameters, a success threshold and the
//! success/lock state machine.
//!
//! ```text
//! Inactive --activate--> Active --error < threshold--> Solved (sticky)
//!
//! Locked <--validate, error < threshold, no grace-- Unlocked
//! Locked --unlock (opens grace window)------------> Unlocked
//! ```
//!
//! The "solved" indicator tracks the live comparison and may flicker after
//! the sticky `solved` flag is set. Activating the successor is the chain's
//! job; [`Validation::newly_solved`] tells it when.

use std::fmt;

use tracing::{debug, info};

use crate::error::{ChallengeError, ModelError};
use crate::models::{Model, ShrinkRule};
use crate::optimizer::{DescentConfig, DescentState, IterationReport, Optimizer};
use crate::parameter::ParameterSet;
use crate::scheduler::DescentSchedule;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Inactive,
    Active,
    Solved,
}

/// Outcome of one `validate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Validation {
    pub error: f64,
    pub below_threshold: bool,
    /// First time this challenge went below threshold.
    pub newly_solved: bool,
    /// Controls went from unlocked to locked during this call.
    pub newly_locked: bool,
}

pub struct Challenge {
    id: String,
    model: Box<dyn Model>,
    params: ParameterSet,
    threshold: f64,

    active: bool,
    solved: bool,
    locked: bool,
    solved_indicator: bool,
    unlock_offered: bool,
    grace_until: Option<u64>,
    last_error: f64,

    config: DescentConfig,
    descent: DescentState,
    schedule: DescentSchedule,
}

impl Challenge {
    pub fn new<M>(id: impl Into<String>, model: M, threshold: f64) -> Result<Self, ChallengeError>
    where
        M: Model + 'static,
    {
        Self::from_boxed(id, Box::new(model), threshold)
    }

    /// Validates the model's declarations, its scale and its error at the defaults.
    pub fn from_boxed(id: impl Into<String>, model: Box<dyn Model>, threshold: f64) -> Result<Self, ChallengeError> {
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ChallengeError::InvalidThreshold(threshold));
        }
        let scale = model.error_scale();
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ModelError::InvalidErrorScale(scale).into());
        }
        let params = ParameterSet::from_specs(model.parameter_specs())?;
        let config = DescentConfig::default();
        let mut challenge = Self {
            id: id.into(),
            model,
            params,
            threshold,
            active: false,
            solved: false,
            locked: true,
            solved_indicator: false,
            unlock_offered: false,
            grace_until: None,
            last_error: 0.0,
            config,
            descent: DescentState::new(&config),
            schedule: DescentSchedule::default(),
        };
        let e = challenge.compute_error();
        if !(e.is_finite() && e >= 0.0) {
            return Err(ModelError::NonFiniteError(e).into());
        }
        challenge.last_error = e;
        debug!(challenge = %challenge.id, family = challenge.model.family(), error = e, "challenge built");
        Ok(challenge)
    }

    /// Replaces the solver constants and restarts the descent state.
    pub fn with_descent_config(mut self, config: DescentConfig) -> Self {
        self.config = config;
        self.descent = DescentState::new(&config);
        self
    }

    /// Schedule used by `auto_solve`.
    pub fn with_schedule(mut self, schedule: DescentSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    pub fn shrink_rule(&self) -> ShrinkRule {
        self.model.shrink_rule()
    }

    pub fn status(&self) -> Status {
        if self.solved {
            Status::Solved
        } else if self.active {
            Status::Active
        } else {
            Status::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Live "solved" indicator: error below threshold at the last validate.
    pub fn solved_indicator(&self) -> bool {
        self.solved_indicator
    }

    /// Whether the host should offer an "unlock" control.
    pub fn unlock_offered(&self) -> bool {
        self.unlock_offered
    }

    pub fn in_grace(&self, now_ms: u64) -> bool {
        self.grace_until.is_some_and(|until| now_ms < until)
    }

    /// Error computed by the last validate (or at construction).
    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    pub(crate) fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }

    pub fn parameter_value(&self, id: &str) -> Option<f64> {
        self.params.try_value(id)
    }

    pub fn descent_config(&self) -> &DescentConfig {
        &self.config
    }

    pub fn descent_state(&self) -> DescentState {
        self.descent
    }

    pub(crate) fn descent_state_mut(&mut self) -> &mut DescentState {
        &mut self.descent
    }

    pub fn schedule(&self) -> DescentSchedule {
        self.schedule
    }

    /// Scored error: `mse * error_scale * cheat_factor`.
    pub fn compute_error(&self) -> f64 {
        self.residual() * self.model.error_scale() * self.descent.cheat_factor
    }

    /// True mean squared error, untouched by scale and cheat factor.
    pub fn residual(&self) -> f64 {
        self.model.mean_squared_error(&self.params)
    }

    /// Interactive write. Needs an active, unlocked challenge.
    pub fn set_parameter(&mut self, id: &str, x: f64) -> Result<(), ChallengeError> {
        if !self.active {
            return Err(ChallengeError::Inactive(self.id.clone()));
        }
        if self.locked {
            return Err(ChallengeError::Locked(self.id.clone()));
        }
        if !self.params.set_value(id, x) {
            return Err(ChallengeError::UnknownParameter {
                challenge: self.id.clone(),
                parameter: id.to_string(),
            });
        }
        Ok(())
    }

    /// Inactive -> Active, unlocking the controls. An active challenge keeps
    /// its lock state. Returns false if it was already active.
    pub fn activate(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.locked = false;
        info!(challenge = %self.id, "challenge activated");
        true
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Unlocks now and suppresses re-locking until `now_ms + grace_ms`.
    pub fn unlock_at(&mut self, now_ms: u64, grace_ms: u64) {
        self.locked = false;
        self.unlock_offered = false;
        let until = now_ms.saturating_add(grace_ms);
        self.grace_until = Some(until);
        debug!(challenge = %self.id, until, "controls unlocked");
    }

    /// Recomputes the error and applies the success/lock rules.
    pub fn validate_at(&mut self, now_ms: u64) -> Validation {
        let error = self.compute_error();
        self.last_error = error;
        let below_threshold = error < self.threshold;

        if self.grace_until.is_some() && !self.in_grace(now_ms) {
            self.grace_until = None;
        }

        let mut newly_locked = false;
        if below_threshold {
            self.solved_indicator = true;
            if !self.in_grace(now_ms) {
                newly_locked = !self.locked;
                self.locked = true;
                self.unlock_offered = true;
            }
        } else {
            self.solved_indicator = false;
        }

        let newly_solved = below_threshold && !self.solved;
        if newly_solved {
            self.solved = true;
            info!(challenge = %self.id, error, threshold = self.threshold, "challenge solved");
        }

        Validation { error, below_threshold, newly_solved, newly_locked }
    }

    /// One solver sweep with this challenge's descent config. Does not validate.
    pub fn gradient_descent_one_iteration(&mut self) -> IterationReport {
        Optimizer::new(self.config).iterate(self)
    }

    /// Back to the default values. Solved/locked flags are untouched.
    pub fn reset(&mut self) {
        self.params.reset_all();
    }

    /// Random values inside the bounds. Solved/locked flags are untouched.
    pub fn scramble(&mut self, seed: u64) {
        self.params.scramble(seed);
    }
}

impl fmt::Debug for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Challenge")
            .field("id", &self.id)
            .field("family", &self.model.family())
            .field("status", &self.status())
            .field("locked", &self.locked)
            .field("threshold", &self.threshold)
            .field("last_error", &self.last_error)
            .field("parameters", &self.params.snapshot())
            .field("descent", &self.descent)
            .finish()
    }
}
