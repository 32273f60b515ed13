// src/puzzles/sdk.rs

//! # Puzzles SDK
//!
//! A **puzzle sequence** is a concrete [`ChallengeChain`] built from models:
//! fixed datasets, thresholds, ids and the challenges open at start.
//!
//! ## Steps to add a sequence
//! 1. Create `src/puzzles/<name>.rs` behind a `puzzle-<name>` feature.
//! 2. Write one constructor per challenge returning
//!    `Result<Challenge, ChallengeError>`.
//! 3. Pass them, in order, to [`chain_from`] together with a base chain.
//! 4. Activate what should be playable at start (the first challenge, or
//!    everything), then hand the chain to the host.
//!
//! Thresholds and error scales are tuned per puzzle; they are part of the
//! puzzle, not of the model family.
//!
//! [`Access`] mirrors the session levels the host exposes: plain play,
//! play with error gauges, and play with every challenge opened and the
//! auto-solver offered.

use crate::chain::ChallengeChain;
use crate::challenge::Challenge;
use crate::error::ChallengeError;

/// Session access level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    #[default]
    Standard,
    /// Error gauges visible.
    Gauges,
    /// Everything open, auto-solve offered.
    AutoSolve,
}

impl Access {
    pub fn gauges_visible(self) -> bool {
        self >= Access::Gauges
    }

    pub fn auto_solve_available(self) -> bool {
        self == Access::AutoSolve
    }

    /// Opens every challenge at the auto-solve level; otherwise a no-op.
    pub fn apply(self, chain: &mut ChallengeChain) {
        if self.auto_solve_available() {
            chain.activate_all();
        }
    }
}

/// Registers `challenges` in order into `chain` (fresh, or carrying a host
/// clock and config).
pub fn chain_from<I>(mut chain: ChallengeChain, challenges: I) -> Result<ChallengeChain, ChallengeError>
where
    I: IntoIterator<Item = Result<Challenge, ChallengeError>>,
{
    for challenge in challenges {
        chain.register(challenge?)?;
    }
    Ok(chain)
}
