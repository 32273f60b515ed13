// src/error.rs

//! Error types.
//!
//! Two layers:
//! - [`ModelError`]: a model variant declared something inconsistent. Raised
//!   while building the model or the challenge wrapping it, never afterwards.
//! - [`ChallengeError`]: the host asked the chain for something it cannot do
//!   (unknown id, locked controls, ...).
//!
//! The numeric core (error computation, descent) has no error path.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("model declares no parameters")]
    NoParameters,
    #[error("parameter `{0}` is declared twice")]
    DuplicateParameter(String),
    #[error("parameter `{id}` has inverted bounds [{min}, {max}]")]
    InvertedBounds { id: String, min: f64, max: f64 },
    #[error("default {default} of parameter `{id}` lies outside [{min}, {max}]")]
    DefaultOutOfBounds { id: String, min: f64, max: f64, default: f64 },
    #[error("polynomial degree {0} is not supported (expected 0..=4)")]
    UnsupportedDegree(usize),
    #[error("target dataset is empty")]
    EmptyDataset,
    #[error("node {0} does not exist")]
    UnknownNode(usize),
    #[error("input node {0} cannot receive an edge")]
    EdgeIntoInput(usize),
    #[error("edge {from} -> {to} does not move forward through the layers")]
    BackwardEdge { from: usize, to: usize },
    #[error("edge {from} -> {to} uses undeclared weight `{weight}`")]
    UndeclaredWeight { from: usize, to: usize, weight: String },
    #[error("error scale must be positive and finite, got {0}")]
    InvalidErrorScale(f64),
    #[error("node {0} is computed but sits on the input layer")]
    ComputedInputLayer(usize),
    #[error("error at the default parameters is not a finite non-negative number ({0})")]
    NonFiniteError(f64),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ChallengeError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("success threshold must be positive and finite, got {0}")]
    InvalidThreshold(f64),
    #[error("unknown challenge `{0}`")]
    UnknownChallenge(String),
    #[error("challenge `{0}` is already registered")]
    DuplicateChallenge(String),
    #[error("challenge `{challenge}` has no parameter `{parameter}`")]
    UnknownParameter { challenge: String, parameter: String },
    #[error("challenge `{0}` is not active yet")]
    Inactive(String),
    #[error("controls of challenge `{0}` are locked")]
    Locked(String),
}

#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed engine config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid engine config: {0}")]
    Invalid(String),
}
