// src/chain.rs

//! The ordered puzzle sequence.
//!
//! Challenges are appended once, in order, and each one only knows its
//! successor. Solving a challenge for the first time activates exactly the
//! next one; nothing ever walks backwards.
//!
//! The chain is an ordinary value owned by the host. It also owns the clock
//! used for unlock grace windows and the observers notified of state
//! changes.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, info};

use crate::challenge::{Challenge, Validation};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::ChallengeError;
use crate::optimizer::IterationReport;
use crate::scheduler::{DescentSchedule, DescentTask, Scheduler, SolveOutcome};

/// Host-side listener. Every method defaults to a no-op.
pub trait Observer {
    /// After each recompute of an active challenge.
    fn on_refresh(&mut self, _challenge: &Challenge) {}
    fn on_activated(&mut self, _challenge: &Challenge) {}
    /// First time the challenge goes below its threshold.
    fn on_solved(&mut self, _challenge: &Challenge) {}
    fn on_lock_changed(&mut self, _challenge: &Challenge, _locked: bool) {}
}

pub struct ChallengeChain {
    challenges: Vec<Challenge>,
    next: Vec<Option<usize>>,
    index: HashMap<String, usize>,
    last_added: Option<usize>,
    clock: Rc<dyn Clock>,
    config: EngineConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Default for ChallengeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ChallengeChain {
    pub fn new() -> Self {
        Self {
            challenges: Vec::new(),
            next: Vec::new(),
            index: HashMap::new(),
            last_added: None,
            clock: Rc::new(SystemClock::new()),
            config: EngineConfig::default(),
            observers: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Applies to challenges registered afterwards.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn observe(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Appends under the challenge's id and links the previous tail to it.
    pub fn register(&mut self, challenge: Challenge) -> Result<(), ChallengeError> {
        if self.index.contains_key(challenge.id()) {
            return Err(ChallengeError::DuplicateChallenge(challenge.id().to_string()));
        }
        let challenge = challenge.with_descent_config(self.config.descent);
        let idx = self.challenges.len();
        self.index.insert(challenge.id().to_string(), idx);
        self.challenges.push(challenge);
        self.next.push(None);
        if let Some(tail) = self.last_added {
            self.next[tail] = Some(idx);
        }
        self.last_added = Some(idx);
        debug!(challenge = self.challenges[idx].id(), position = idx, "challenge registered");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    fn index_of(&self, id: &str) -> Result<usize, ChallengeError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| ChallengeError::UnknownChallenge(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Option<&Challenge> {
        self.index.get(id).map(|&i| &self.challenges[i])
    }

    pub fn challenge(&self, id: &str) -> Result<&Challenge, ChallengeError> {
        self.index_of(id).map(|i| &self.challenges[i])
    }

    pub(crate) fn challenge_mut(&mut self, id: &str) -> Result<&mut Challenge, ChallengeError> {
        let i = self.index_of(id)?;
        Ok(&mut self.challenges[i])
    }

    pub fn first(&self) -> Option<&Challenge> {
        self.challenges.first()
    }

    /// Successor of `id`, if any.
    pub fn next_of(&self, id: &str) -> Option<&Challenge> {
        let i = self.index.get(id)?;
        self.next[*i].map(|n| &self.challenges[n])
    }

    /// Forward walk from the first challenge along the `next` links.
    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        let start = if self.challenges.is_empty() { None } else { Some(0) };
        std::iter::successors(start, |&i| self.next[i]).map(|i| &self.challenges[i])
    }

    /// First active challenge that is not solved yet.
    pub fn frontier(&self) -> Option<&Challenge> {
        self.iter().find(|c| c.is_active() && !c.is_solved())
    }

    pub fn parameter_value(&self, id: &str, parameter: &str) -> Result<f64, ChallengeError> {
        let ch = self.challenge(id)?;
        ch.parameter_value(parameter).ok_or_else(|| ChallengeError::UnknownParameter {
            challenge: id.to_string(),
            parameter: parameter.to_string(),
        })
    }

    fn notify<F>(&mut self, i: usize, mut f: F)
    where
        F: FnMut(&mut dyn Observer, &Challenge),
    {
        let ch = &self.challenges[i];
        for o in self.observers.iter_mut() {
            f(o.as_mut(), ch);
        }
    }

    /// Validates challenge `start` and, on a first solve, activates its
    /// successor if needed and re-validates it (repeating if that one is
    /// solved on the spot).
    fn settle(&mut self, start: usize, refresh: bool) -> Option<Validation> {
        let now = self.clock.now_ms();
        let mut first = None;
        let mut cursor = Some(start);
        let mut refresh = refresh;

        while let Some(i) = cursor.take() {
            if !self.challenges[i].is_active() {
                break;
            }
            let v = self.challenges[i].validate_at(now);
            if refresh {
                self.notify(i, |o, c| o.on_refresh(c));
            }
            if v.newly_locked {
                self.notify(i, |o, c| o.on_lock_changed(c, true));
            }
            first.get_or_insert(v);

            if v.newly_solved {
                self.notify(i, |o, c| o.on_solved(c));
                if let Some(n) = self.next[i] {
                    if self.challenges[n].activate() {
                        self.notify(n, |o, c| o.on_activated(c));
                    }
                    cursor = Some(n);
                    refresh = true;
                }
            }
        }
        first
    }

    /// Marks `id` active and runs a refresh cycle. Only a first activation
    /// unlocks the controls.
    pub fn activate(&mut self, id: &str) -> Result<(), ChallengeError> {
        let i = self.index_of(id)?;
        if self.challenges[i].activate() {
            self.notify(i, |o, c| o.on_activated(c));
        }
        self.settle(i, true);
        Ok(())
    }

    /// Opens every challenge at once.
    pub fn activate_all(&mut self) {
        let order: Vec<usize> = {
            let start = if self.challenges.is_empty() { None } else { Some(0) };
            std::iter::successors(start, |&i| self.next[i]).collect()
        };
        for i in order {
            if self.challenges[i].activate() {
                self.notify(i, |o, c| o.on_activated(c));
            }
            self.settle(i, true);
        }
        info!(challenges = self.challenges.len(), "all challenges activated");
    }

    /// Recompute, notify observers, validate. `None` while inactive.
    pub fn update(&mut self, id: &str) -> Result<Option<Validation>, ChallengeError> {
        let i = self.index_of(id)?;
        Ok(self.settle(i, true))
    }

    /// Recompute and validate without a refresh notification. `None` while inactive.
    pub fn validate(&mut self, id: &str) -> Result<Option<Validation>, ChallengeError> {
        let i = self.index_of(id)?;
        Ok(self.settle(i, false))
    }

    /// Interactive write followed by an update.
    pub fn set_parameter(&mut self, id: &str, parameter: &str, value: f64) -> Result<Option<Validation>, ChallengeError> {
        let i = self.index_of(id)?;
        self.challenges[i].set_parameter(parameter, value)?;
        Ok(self.settle(i, true))
    }

    /// Unlocks `id` and opens the grace window.
    pub fn unlock(&mut self, id: &str) -> Result<(), ChallengeError> {
        let i = self.index_of(id)?;
        let was_locked = self.challenges[i].is_locked();
        self.challenges[i].unlock_at(self.clock.now_ms(), self.config.unlock_grace_ms);
        if was_locked {
            self.notify(i, |o, c| o.on_lock_changed(c, false));
        }
        Ok(())
    }

    /// Default values back, then an update.
    pub fn reset(&mut self, id: &str) -> Result<Option<Validation>, ChallengeError> {
        let i = self.index_of(id)?;
        self.challenges[i].reset();
        Ok(self.settle(i, true))
    }

    /// Random values inside the bounds, then an update.
    pub fn scramble(&mut self, id: &str, seed: u64) -> Result<Option<Validation>, ChallengeError> {
        let i = self.index_of(id)?;
        self.challenges[i].scramble(seed);
        Ok(self.settle(i, true))
    }

    /// One solver sweep followed by an update.
    pub fn gradient_descent_one_iteration(&mut self, id: &str) -> Result<IterationReport, ChallengeError> {
        let i = self.index_of(id)?;
        let report = self.challenges[i].gradient_descent_one_iteration();
        self.settle(i, true);
        Ok(report)
    }

    /// Runs a whole descent on the calling thread, sleeping between batches.
    pub fn gradient_descent(&mut self, id: &str, schedule: DescentSchedule) -> Result<SolveOutcome, ChallengeError> {
        self.index_of(id)?;
        let mut scheduler = Scheduler::new();
        scheduler.spawn(DescentTask::new(id, schedule));
        let mut outcomes = scheduler.run(self, std::thread::sleep)?;
        outcomes
            .pop()
            .ok_or_else(|| ChallengeError::UnknownChallenge(id.to_string()))
    }

    /// [`gradient_descent`](Self::gradient_descent) with the challenge's own schedule.
    pub fn auto_solve(&mut self, id: &str) -> Result<SolveOutcome, ChallengeError> {
        let schedule = self.challenge(id)?.schedule();
        info!(challenge = id, ?schedule, "auto-solve started");
        self.gradient_descent(id, schedule)
    }
}
