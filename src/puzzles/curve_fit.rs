// src/puzzles/curve_fit.rs

//! Curve-fitting sequence.
//!
//! | id           | fit                | points | x range      | threshold |
//! |--------------|--------------------|--------|--------------|-----------|
//! | `challenge1` | line               | 20     | [-9, 9]      | 4e-5      |
//! | `challenge2` | degree 2           | 25     | [-1.3, 1.3]  | 2e-4      |
//! | `challenge3` | degree 3           | 25     | [-1.3, 1.3]  | 2e-4      |
//! | `challenge4` | degree 4           | 25     | [-1.3, 1.3]  | 1e-7      |
//!
//! Only the line is open at start. The line's error is scaled by 0.01 and
//! its auto-solve runs a much longer, twice-refreshed schedule.

use crate::chain::ChallengeChain;
use crate::challenge::Challenge;
use crate::error::ChallengeError;
use crate::mechanics::sample_curve;
use crate::models::PolynomialModel;
use crate::puzzles::sdk::chain_from;
use crate::scheduler::DescentSchedule;

pub const LINE: &str = "challenge1";
pub const QUADRATIC: &str = "challenge2";
pub const CUBIC: &str = "challenge3";
pub const QUARTIC: &str = "challenge4";

/// `y = -0.3 x + 2`.
pub fn line() -> Result<Challenge, ChallengeError> {
    let points = sample_curve(|x| -0.3 * x + 2.0, -9.0, 9.0, 20);
    let model = PolynomialModel::line(points, 0.01)?;
    Ok(Challenge::new(LINE, model, 0.00004)?.with_schedule(DescentSchedule::new(1_000_000, 2, 5)))
}

pub fn quadratic() -> Result<Challenge, ChallengeError> {
    let model = PolynomialModel::sampled(&[0.65, 0.28, -0.41], -1.3, 1.3, 25, 1.0)?;
    Challenge::new(QUADRATIC, model, 0.0002)
}

pub fn cubic() -> Result<Challenge, ChallengeError> {
    let model = PolynomialModel::sampled(&[0.02, 0.66, 0.53, -0.47], -1.3, 1.3, 25, 1.0)?;
    Challenge::new(CUBIC, model, 0.0002)
}

pub fn quartic() -> Result<Challenge, ChallengeError> {
    let model = PolynomialModel::sampled(&[0.13, -0.8, 0.72, 0.79, -0.68], -1.3, 1.3, 25, 1.0)?;
    Challenge::new(QUARTIC, model, 1e-7)
}

/// The full sequence with the line opened.
pub fn curve_fit_chain() -> Result<ChallengeChain, ChallengeError> {
    curve_fit_chain_in(ChallengeChain::new())
}

/// Same, registered into a host-configured chain.
pub fn curve_fit_chain_in(base: ChallengeChain) -> Result<ChallengeChain, ChallengeError> {
    let mut chain = chain_from(base, [line(), quadratic(), cubic(), quartic()])?;
    chain.activate(LINE)?;
    Ok(chain)
}
