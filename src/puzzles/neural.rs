// src/puzzles/neural.rs

//! Neural-network sequence. Every weight lives in `[0, 1]` and starts at 0.5.
//!
//! - `challenge1`: one weight, `100 -> 77`.
//! - `challenge2`: 2 inputs, 2 outputs, weights `a..d`.
//! - `challenge3`: 3 inputs, 2 outputs, weights `a..f`.
//! - `challenge4`: one 2-2-2 network evaluated on three input pairs at once,
//!   weights `a..h` shared by all copies.
//!
//! All four are open at start.

use crate::chain::ChallengeChain;
use crate::challenge::Challenge;
use crate::error::ChallengeError;
use crate::models::{PropagationModel, SingleWeightModel, TopologyBuilder};
use crate::parameter::ParameterSpec;
use crate::puzzles::sdk::chain_from;

pub const SINGLE: &str = "challenge1";
pub const TWO_BY_TWO: &str = "challenge2";
pub const THREE_BY_TWO: &str = "challenge3";
pub const SHARED_COPIES: &str = "challenge4";

const WEIGHT_MIN: f64 = 0.0;
const WEIGHT_MAX: f64 = 1.0;
const WEIGHT_DEFAULT: f64 = 0.5;

fn weights(ids: &[&str]) -> Vec<ParameterSpec> {
    PropagationModel::uniform_weights(ids.iter().copied(), WEIGHT_MIN, WEIGHT_MAX, WEIGHT_DEFAULT)
}

pub fn single() -> Result<Challenge, ChallengeError> {
    let weight = ParameterSpec::new("a", WEIGHT_MIN, WEIGHT_MAX, WEIGHT_DEFAULT);
    let model = SingleWeightModel::new(100.0, 77.0, weight, 0.0001686625)?;
    Challenge::new(SINGLE, model, 0.0001)
}

pub fn two_by_two() -> Result<Challenge, ChallengeError> {
    let mut b = TopologyBuilder::new();
    let (i0, i1) = (b.input(83.0), b.input(22.0));
    let (o0, o1) = (b.node(1), b.node(1));
    b.connect(i0, o0, "d")
        .connect(i1, o0, "b")
        .connect(i0, o1, "c")
        .connect(i1, o1, "a")
        .target(o0, 43.0)
        .target(o1, 26.0);
    let model = PropagationModel::new(b.build()?, weights(&["a", "b", "c", "d"]), 1.0 / 5000.0)?;
    Challenge::new(TWO_BY_TWO, model, 0.002)
}

pub fn three_by_two() -> Result<Challenge, ChallengeError> {
    let mut b = TopologyBuilder::new();
    let inputs = [b.input(12.0), b.input(83.0), b.input(22.0)];
    let (o0, o1) = (b.node(1), b.node(1));
    for (n, (w0, w1)) in inputs.into_iter().zip([("a", "d"), ("b", "e"), ("c", "f")]) {
        b.connect(n, o0, w0).connect(n, o1, w1);
    }
    b.target(o0, 43.0).target(o1, 26.0);
    let model = PropagationModel::new(b.build()?, weights(&["a", "b", "c", "d", "e", "f"]), 1.0 / 4500.0)?;
    Challenge::new(THREE_BY_TWO, model, 0.002)
}

pub fn shared_copies() -> Result<Challenge, ChallengeError> {
    const CASES: [((f64, f64), (f64, f64)); 3] = [
        ((100.0, 0.0), (35.0, 93.0)),
        ((100.0, 100.0), (45.0, 100.0)),
        ((0.0, 100.0), (14.0, 90.0)),
    ];
    let mut b = TopologyBuilder::new();
    for ((x0, x1), (t0, t1)) in CASES {
        let (i0, i1) = (b.input(x0), b.input(x1));
        let (h0, h1) = (b.node(1), b.node(1));
        let (o0, o1) = (b.node(2), b.node(2));
        b.connect(i0, h0, "d")
            .connect(i0, h1, "c")
            .connect(i1, h0, "b")
            .connect(i1, h1, "a")
            .connect(h0, o0, "h")
            .connect(h0, o1, "g")
            .connect(h1, o0, "f")
            .connect(h1, o1, "e")
            .target(o0, t0)
            .target(o1, t1);
    }
    let ids = ["a", "b", "c", "d", "e", "f", "g", "h"];
    let model = PropagationModel::new(b.build()?, weights(&ids), 1.0 / 3000.0)?;
    Challenge::new(SHARED_COPIES, model, 0.0001)
}

/// The full sequence with every challenge opened.
pub fn neural_chain() -> Result<ChallengeChain, ChallengeError> {
    neural_chain_in(ChallengeChain::new())
}

pub fn neural_chain_in(base: ChallengeChain) -> Result<ChallengeChain, ChallengeError> {
    let mut chain = chain_from(base, [single(), two_by_two(), three_by_two(), shared_copies()])?;
    chain.activate_all();
    Ok(chain)
}
