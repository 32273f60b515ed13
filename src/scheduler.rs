// src/scheduler.rs

//! Batched, resumable solver runs.
//!
//! A [`DescentTask`] is one multi-iteration run over one challenge. Each
//! `resume` performs solver iterations up to the next refresh boundary
//! (`i % refresh_rate == 0`, so the very first batch is a single iteration),
//! refreshes the challenge through the chain (recompute, notify, validate)
//! and then either finishes (solved, or out of iterations) or yields. A yield
//! asks the driver to pause when the schedule's delay exceeds 1 ms.
//!
//! Nothing is locked between resumes: the host may move parameters by hand
//! while a run is suspended, and the next iteration simply starts from
//! wherever they are. There is no cancel signal; drop the task to stop it.

use std::collections::VecDeque;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::ChallengeChain;
use crate::error::ChallengeError;
use crate::optimizer::DescentState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DescentSchedule {
    pub max_iterations: usize,
    /// Iterations between refreshes; 0 is treated as 1.
    pub refresh_rate: usize,
    /// Pause requested after each refresh. Ignored at 1 ms and below.
    pub delay_ms: u64,
}

impl Default for DescentSchedule {
    fn default() -> Self {
        Self { max_iterations: 10_000, refresh_rate: 1, delay_ms: 10 }
    }
}

impl DescentSchedule {
    pub fn new(max_iterations: usize, refresh_rate: usize, delay_ms: u64) -> Self {
        Self { max_iterations, refresh_rate, delay_ms }
    }

    /// Same budget and refresh rate, no pauses.
    pub fn without_delay(self) -> Self {
        Self { delay_ms: 0, ..self }
    }

    pub fn pause(&self) -> Option<Duration> {
        (self.delay_ms > 1).then(|| Duration::from_millis(self.delay_ms))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolveOutcome {
    pub challenge: String,
    pub iterations: usize,
    pub error: f64,
    pub solved: bool,
    pub descent: DescentState,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Progress {
    Yielded {
        iteration: usize,
        error: f64,
        delay: Option<Duration>,
    },
    Finished(SolveOutcome),
}

#[derive(Clone, Debug)]
pub struct DescentTask {
    challenge: String,
    schedule: DescentSchedule,
    iteration: usize,
    outcome: Option<SolveOutcome>,
}

impl DescentTask {
    pub fn new(challenge: impl Into<String>, schedule: DescentSchedule) -> Self {
        Self { challenge: challenge.into(), schedule, iteration: 0, outcome: None }
    }

    pub fn challenge(&self) -> &str {
        &self.challenge
    }

    pub fn schedule(&self) -> DescentSchedule {
        self.schedule
    }

    /// Iterations performed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Runs one batch. Resuming a finished task returns its outcome again.
    pub fn resume(&mut self, chain: &mut ChallengeChain) -> Result<Progress, ChallengeError> {
        if let Some(done) = &self.outcome {
            return Ok(Progress::Finished(done.clone()));
        }
        let refresh = self.schedule.refresh_rate.max(1);
        loop {
            if self.iteration >= self.schedule.max_iterations {
                return self.finish(chain);
            }
            let at_refresh = self.iteration % refresh == 0;
            chain.challenge_mut(&self.challenge)?.gradient_descent_one_iteration();
            self.iteration += 1;

            if at_refresh {
                chain.update(&self.challenge)?;
                let ch = chain.challenge(&self.challenge)?;
                if ch.is_solved() {
                    return self.finish(chain);
                }
                return Ok(Progress::Yielded {
                    iteration: self.iteration,
                    error: ch.last_error(),
                    delay: self.schedule.pause(),
                });
            }
        }
    }

    fn finish(&mut self, chain: &ChallengeChain) -> Result<Progress, ChallengeError> {
        let ch = chain.challenge(&self.challenge)?;
        let outcome = SolveOutcome {
            challenge: self.challenge.clone(),
            iterations: self.iteration,
            error: ch.compute_error(),
            solved: ch.is_solved(),
            descent: ch.descent_state(),
        };
        debug!(
            challenge = %outcome.challenge,
            iterations = outcome.iterations,
            error = outcome.error,
            solved = outcome.solved,
            "descent finished"
        );
        self.outcome = Some(outcome.clone());
        Ok(Progress::Finished(outcome))
    }
}

/// Result of resuming every pending task once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tick {
    pub finished: Vec<SolveOutcome>,
    /// Longest pause any yielding task asked for.
    pub delay: Option<Duration>,
}

/// Round-robin driver for pending descent tasks.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: VecDeque<DescentTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, task: DescentTask) {
        self.tasks.push_back(task);
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Resumes each pending task once; finished ones leave the queue.
    /// A task whose challenge vanished is dropped and its error returned.
    pub fn tick(&mut self, chain: &mut ChallengeChain) -> Result<Tick, ChallengeError> {
        let mut tick = Tick::default();
        for _ in 0..self.tasks.len() {
            let Some(mut task) = self.tasks.pop_front() else { break };
            match task.resume(chain)? {
                Progress::Finished(outcome) => tick.finished.push(outcome),
                Progress::Yielded { delay, .. } => {
                    tick.delay = tick.delay.max(delay);
                    self.tasks.push_back(task);
                }
            }
        }
        Ok(tick)
    }

    /// Ticks until idle, handing every requested pause to `sleep`.
    pub fn run<S>(&mut self, chain: &mut ChallengeChain, mut sleep: S) -> Result<Vec<SolveOutcome>, ChallengeError>
    where
        S: FnMut(Duration),
    {
        let mut finished = Vec::new();
        while !self.is_idle() {
            let tick = self.tick(chain)?;
            finished.extend(tick.finished);
            if let Some(d) = tick.delay {
                sleep(d);
            }
        }
        Ok(finished)
    }
}
