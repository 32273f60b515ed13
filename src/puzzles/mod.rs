// src/puzzles/mod.rs

// Ready-made puzzle sequences built on the models.
// Each sequence is feature-gated so hosts compile only the ones they ship.

pub mod sdk;
pub use sdk::*;

#[cfg(feature = "puzzle-curve_fit")]
pub mod curve_fit;

#[cfg(feature = "puzzle-curve_fit")]
pub use curve_fit::curve_fit_chain;

#[cfg(feature = "puzzle-neural")]
pub mod neural;

#[cfg(feature = "puzzle-neural")]
pub use neural::neural_chain;
